use chrono::{Days, NaiveDate};

use crate::types::{CityContext, ForecastError};

/// Check the engine's preconditions before any day is computed.
///
/// # Arguments
/// * `context` - Context snapshot for the window
/// * `start` - First forecast day
/// * `horizon_days` - Number of days to forecast
///
/// # Errors
/// Returns `ForecastError::InvalidInput` if the horizon is zero, the population is zero,
/// the average temperature is not finite, or the last day of the window falls outside
/// the representable calendar.
pub fn validate_inputs(
    context: &CityContext,
    start: NaiveDate,
    horizon_days: usize,
) -> Result<(), ForecastError> {
    if horizon_days == 0 {
        return Err(ForecastError::InvalidInput(
            "horizon must cover at least one day".to_string(),
        ));
    }

    if context.population == 0 {
        return Err(ForecastError::InvalidInput(
            "population must be positive".to_string(),
        ));
    }

    if !context.avg_monthly_temp.is_finite() {
        return Err(ForecastError::InvalidInput(format!(
            "average temperature must be finite, got {}",
            context.avg_monthly_temp
        )));
    }

    // Last day must exist so no partial result is ever produced
    offset_date(start, horizon_days - 1)?;

    Ok(())
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start_date(s: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ForecastError::InvalidInput(format!("unparsable start date '{s}': {e}")))
}

/// `start` advanced by `offset` calendar days.
pub fn offset_date(start: NaiveDate, offset: usize) -> Result<NaiveDate, ForecastError> {
    start
        .checked_add_days(Days::new(offset as u64))
        .ok_or_else(|| {
            ForecastError::InvalidInput(format!("{start} + {offset} days is out of range"))
        })
}
