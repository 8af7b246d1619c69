use thiserror::Error;

/// Parsed state of the revenue entry field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevenueInput {
    /// Empty or non-numeric text. Nothing is calculated or displayed.
    Missing,
    Revenue(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("revenue must be >= 0, got {0}")]
    NegativeRevenue(f64),
}

pub fn parse_revenue(raw: &str) -> Result<RevenueInput, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(RevenueInput::Missing);
    }

    let Ok(value) = trimmed.parse::<f64>() else {
        return Ok(RevenueInput::Missing);
    };
    revenue_from_number(value)
}

/// Applies the same rules as [`parse_revenue`] to an already numeric value.
pub fn revenue_from_number(value: f64) -> Result<RevenueInput, InputError> {
    if !value.is_finite() {
        return Ok(RevenueInput::Missing);
    }
    if value < 0.0 {
        return Err(InputError::NegativeRevenue(value));
    }

    // "-0" parses to negative zero; keep it out of the formatted output.
    Ok(RevenueInput::Revenue(value.abs()))
}
