//! Fixed design constants of the demand model and defaults for the auxiliary tools.

/// Year at which `CityContext::population` is measured.
pub const REFERENCE_YEAR: i32 = 2024;
/// Compound annual population growth factor (1.2% per year).
pub const ANNUAL_GROWTH_FACTOR: f64 = 1.012;
/// Litres per capita per day.
pub const PER_CAPITA_LITRES: f64 = 135.0;
/// Litres in one megalitre.
pub const LITRES_PER_ML: f64 = 1_000_000.0;

/// Demand rises only above this daily temperature (°C).
pub const COMFORT_THRESHOLD_C: f64 = 28.0;
/// Fractional demand increase per degree above the comfort threshold.
pub const WEATHER_SENSITIVITY: f64 = 0.04;
/// Angular step of the day-of-month temperature oscillation.
pub const TEMP_OSCILLATION_STEP: f64 = 0.5;
/// Peak amplitude of the day-of-month temperature oscillation (°C).
pub const TEMP_OSCILLATION_AMPLITUDE: f64 = 2.0;

pub const SUNDAY_INDUSTRIAL_FACTOR: f64 = 0.4;
pub const WEEKDAY_INDUSTRIAL_FACTOR: f64 = 0.95;
/// Share of base demand attributable to industrial load at full activity.
pub const INDUSTRIAL_SHARE: f64 = 0.12;

pub const FESTIVAL_LOW_MULTIPLIER: f64 = 0.02;
pub const FESTIVAL_MEDIUM_MULTIPLIER: f64 = 0.08;
pub const FESTIVAL_HIGH_MULTIPLIER: f64 = 0.15;

/// Horizons longer than this get compact day + narrow-month labels.
pub const COMPACT_LABEL_THRESHOLD_DAYS: usize = 14;

pub const SHORT_TERM_DAYS: usize = 7;
pub const MID_TERM_DAYS: usize = 30;

/// Ward population used when the context payload omits one.
pub const DEFAULT_POPULATION: u64 = 1_500_000;

pub const DEFAULT_HISTORY_DAYS: usize = 15;
pub const DEFAULT_HISTORY_SEED: u64 = 42;
pub const DEFAULT_HISTORY_BASELINE_MLD: f64 = 202.5;
pub const DEFAULT_HISTORY_DEMAND_SPREAD: f64 = 10.0;
pub const DEFAULT_HISTORY_TEMP_FLOOR: f64 = 28.0;
pub const DEFAULT_HISTORY_TEMP_SPREAD: f64 = 5.0;
