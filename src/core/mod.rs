mod engine;
mod types;

pub use engine::{CURRENCY_SYMBOL, band_label, calculate, format_money};
pub use types::{BandSchedule, BreakdownEntry, CommissionBand, CommissionResult, ScheduleError};
