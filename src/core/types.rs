use serde::Serialize;
use thiserror::Error;

/// One marginal-rate tier. `end` of `None` means the band is unbounded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CommissionBand {
    pub start: f64,
    pub end: Option<f64>,
    pub rate: f64,
}

impl CommissionBand {
    pub const fn bounded(start: f64, end: f64, rate: f64) -> Self {
        Self {
            start,
            end: Some(end),
            rate,
        }
    }

    pub const fn unbounded(start: f64, rate: f64) -> Self {
        Self {
            start,
            end: None,
            rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("band schedule must contain at least one band")]
    Empty,
    #[error("first band must start at 0, got {0}")]
    FirstBandStart(f64),
    #[error("band {index} has an invalid start {start}")]
    InvalidStart { index: usize, start: f64 },
    #[error("band {index} has rate {rate}; rates must be between 0 and 1")]
    InvalidRate { index: usize, rate: f64 },
    #[error("band {index} ends at {end}, which is not above its start {start}")]
    EmptyBand { index: usize, start: f64, end: f64 },
    #[error("band {index} ends at {end} but the next band starts at {next_start}")]
    Gap {
        index: usize,
        end: f64,
        next_start: f64,
    },
    #[error("band {index} is unbounded but is not the last band")]
    UnboundedBeforeLast { index: usize },
    #[error("last band must be unbounded")]
    LastBandBounded,
}

/// Ordered, contiguous band schedule. Only constructible through validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSchedule {
    bands: Vec<CommissionBand>,
}

impl BandSchedule {
    pub fn new(bands: Vec<CommissionBand>) -> Result<Self, ScheduleError> {
        let Some(first) = bands.first() else {
            return Err(ScheduleError::Empty);
        };
        if first.start != 0.0 {
            return Err(ScheduleError::FirstBandStart(first.start));
        }

        for (index, band) in bands.iter().enumerate() {
            if !band.start.is_finite() || band.start < 0.0 {
                return Err(ScheduleError::InvalidStart {
                    index,
                    start: band.start,
                });
            }
            if !(0.0..=1.0).contains(&band.rate) {
                return Err(ScheduleError::InvalidRate {
                    index,
                    rate: band.rate,
                });
            }

            match (band.end, bands.get(index + 1)) {
                (Some(end), _) if !end.is_finite() || end <= band.start => {
                    return Err(ScheduleError::EmptyBand {
                        index,
                        start: band.start,
                        end,
                    });
                }
                (Some(end), Some(next)) if end != next.start => {
                    return Err(ScheduleError::Gap {
                        index,
                        end,
                        next_start: next.start,
                    });
                }
                (Some(_), None) => return Err(ScheduleError::LastBandBounded),
                (None, Some(_)) => return Err(ScheduleError::UnboundedBeforeLast { index }),
                _ => {}
            }
        }

        Ok(Self { bands })
    }

    /// The shipped schedule: nothing below 5k, then 10/15/20/25% per 5k band.
    pub fn standard() -> Self {
        Self {
            bands: vec![
                CommissionBand::bounded(0.0, 5_000.0, 0.0),
                CommissionBand::bounded(5_000.0, 10_000.0, 0.10),
                CommissionBand::bounded(10_000.0, 15_000.0, 0.15),
                CommissionBand::bounded(15_000.0, 20_000.0, 0.20),
                CommissionBand::unbounded(20_000.0, 0.25),
            ],
        }
    }

    pub fn bands(&self) -> &[CommissionBand] {
        &self.bands
    }
}

impl Default for BandSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionResult {
    /// Total commission rounded to two decimal places.
    pub total: String,
    pub breakdown: Vec<BreakdownEntry>,
}

impl CommissionResult {
    /// Unrounded sum of the breakdown amounts.
    pub fn total_value(&self) -> f64 {
        self.breakdown.iter().map(|entry| entry.amount).sum()
    }
}
