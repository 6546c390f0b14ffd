use chrono::{Datelike, NaiveDate, Weekday};

use crate::data::{offset_date, parse_start_date, validate_inputs};
use crate::defaults::{
    ANNUAL_GROWTH_FACTOR, COMFORT_THRESHOLD_C, COMPACT_LABEL_THRESHOLD_DAYS, INDUSTRIAL_SHARE,
    LITRES_PER_ML, PER_CAPITA_LITRES, REFERENCE_YEAR, SUNDAY_INDUSTRIAL_FACTOR,
    TEMP_OSCILLATION_AMPLITUDE, TEMP_OSCILLATION_STEP, WEATHER_SENSITIVITY,
    WEEKDAY_INDUSTRIAL_FACTOR,
};
use crate::types::{CityContext, DailyForecast, DemandBreakdown, FestivalEvent, ForecastError};

const MONTH_INITIALS: [char; 12] = ['J', 'F', 'M', 'A', 'M', 'J', 'J', 'A', 'S', 'O', 'N', 'D'];

/// Population on `date`, compounding 1.2% for each whole year past the reference year.
///
/// Dates in or before the reference year get no growth.
pub fn population_at(population: u64, date: NaiveDate) -> f64 {
    let years = (date.year() - REFERENCE_YEAR).max(0);
    population as f64 * ANNUAL_GROWTH_FACTOR.powi(years)
}

/// Per-capita baseline, MLD.
pub fn base_demand(population: f64) -> f64 {
    population * PER_CAPITA_LITRES / LITRES_PER_ML
}

/// Pseudo-daily temperature: the monthly mean plus an oscillation keyed on day-of-month.
///
/// Not a weather feed. The same calendar day-of-month always yields the same offset.
pub fn daily_temperature(avg_monthly_temp: f64, date: NaiveDate) -> f64 {
    let offset = (date.day() as f64 * TEMP_OSCILLATION_STEP).sin() * TEMP_OSCILLATION_AMPLITUDE;
    avg_monthly_temp + offset
}

/// Extra demand from heat above the comfort threshold. Never negative.
pub fn weather_adjustment(base: f64, avg_monthly_temp: f64, date: NaiveDate) -> f64 {
    let excess = (daily_temperature(avg_monthly_temp, date) - COMFORT_THRESHOLD_C).max(0.0);
    base * excess * WEATHER_SENSITIVITY
}

/// Industrial load: reduced on Sundays, full on every other day.
///
/// The context's industrial activity bucket does not enter this formula.
pub fn industrial_adjustment(base: f64, date: NaiveDate) -> f64 {
    let factor = if date.weekday() == Weekday::Sun {
        SUNDAY_INDUSTRIAL_FACTOR
    } else {
        WEEKDAY_INDUSTRIAL_FACTOR
    };
    base * factor * INDUSTRIAL_SHARE
}

/// First festival listed for exactly `date_key` (`YYYY-MM-DD`).
///
/// Later events on the same date are ignored, never summed.
pub fn festival_on<'a>(
    festivals: &'a [FestivalEvent],
    date_key: &str,
) -> Option<&'a FestivalEvent> {
    festivals.iter().find(|f| f.date == date_key)
}

/// Festival surge for the matched event, zero when there is none or its impact is unknown.
pub fn festival_adjustment(base: f64, festival: Option<&FestivalEvent>) -> f64 {
    festival
        .and_then(|f| f.impact_level)
        .map_or(0.0, |level| base * level.multiplier())
}

/// Chart label: `"Jun 4"` for short horizons, `"4 J"` beyond two weeks.
pub fn display_label(date: NaiveDate, horizon_days: usize) -> String {
    if horizon_days > COMPACT_LABEL_THRESHOLD_DAYS {
        format!("{} {}", date.day(), MONTH_INITIALS[date.month0() as usize])
    } else {
        date.format("%b %-d").to_string()
    }
}

/// Compute a single day. Depends only on `context` and `date`.
pub fn forecast_day(context: &CityContext, date: NaiveDate, horizon_days: usize) -> DailyForecast {
    let base = base_demand(population_at(context.population, date));
    let date_key = date.format("%Y-%m-%d").to_string();

    let breakdown = DemandBreakdown {
        base,
        weather: weather_adjustment(base, context.avg_monthly_temp, date),
        industrial: industrial_adjustment(base, date),
        festival: festival_adjustment(base, festival_on(&context.festivals, &date_key)),
    };

    DailyForecast {
        date,
        display_label: display_label(date, horizon_days),
        total_demand: breakdown.total(),
        breakdown,
    }
}

/// Day-by-day demand curve for `horizon_days` days starting at `start`.
///
/// Pure and deterministic: no I/O, no clock, no shared state.
///
/// # Arguments
/// * `context` - Context snapshot for the window
/// * `start` - First forecast day
/// * `horizon_days` - Number of days, at least one
///
/// # Returns
/// Records in ascending date order, one per day, each with a breakdown whose
/// components sum to `total_demand`.
///
/// # Errors
/// Returns `ForecastError::InvalidInput` if the preconditions fail. Nothing is
/// computed in that case.
pub fn forecast(
    context: &CityContext,
    start: NaiveDate,
    horizon_days: usize,
) -> Result<Vec<DailyForecast>, ForecastError> {
    validate_inputs(context, start, horizon_days)?;

    (0..horizon_days)
        .map(|i| offset_date(start, i).map(|date| forecast_day(context, date, horizon_days)))
        .collect()
}

/// Same as [`forecast`] with a `YYYY-MM-DD` start date.
pub fn forecast_from_str(
    context: &CityContext,
    start: &str,
    horizon_days: usize,
) -> Result<Vec<DailyForecast>, ForecastError> {
    let start = parse_start_date(start)?;
    forecast(context, start, horizon_days)
}
