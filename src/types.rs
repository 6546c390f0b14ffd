use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::defaults::{
    DEFAULT_HISTORY_BASELINE_MLD, DEFAULT_HISTORY_DAYS, DEFAULT_HISTORY_DEMAND_SPREAD,
    DEFAULT_HISTORY_SEED, DEFAULT_HISTORY_TEMP_FLOOR, DEFAULT_HISTORY_TEMP_SPREAD,
    DEFAULT_POPULATION, FESTIVAL_HIGH_MULTIPLIER, FESTIVAL_LOW_MULTIPLIER,
    FESTIVAL_MEDIUM_MULTIPLIER, MID_TERM_DAYS, SHORT_TERM_DAYS,
};

/// Expected crowd impact of a festival on water demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    /// Fraction of base demand added on the festival day.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Low => FESTIVAL_LOW_MULTIPLIER,
            Self::Medium => FESTIVAL_MEDIUM_MULTIPLIER,
            Self::High => FESTIVAL_HIGH_MULTIPLIER,
        }
    }
}

impl FromStr for ImpactLevel {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ForecastError::InvalidInput(format!(
                "unknown impact level '{other}'"
            ))),
        }
    }
}

/// Activity bucket of the city's industrial zone.
///
/// Carried through for presentation and reasoning. The engine's industrial
/// adjustment depends only on the weekday, not on this value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustrialActivity {
    Low,
    #[default]
    Normal,
    High,
}

impl fmt::Display for IndustrialActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

/// A dated event expected to change demand.
///
/// `impact_level` is `None` when the provider omitted it or sent a value
/// outside {low, medium, high}; such events add nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalEvent {
    #[serde(default)]
    pub name: String,
    /// Calendar date as `YYYY-MM-DD`, matched verbatim against forecast days.
    /// Empty or malformed dates never match.
    #[serde(default)]
    pub date: String,
    #[serde(
        default,
        deserialize_with = "lenient_impact",
        skip_serializing_if = "Option::is_none"
    )]
    pub impact_level: Option<ImpactLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_crowd_size: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl FestivalEvent {
    pub fn new(name: &str, date: &str, impact_level: ImpactLevel) -> Self {
        Self {
            name: name.to_string(),
            date: date.to_string(),
            impact_level: Some(impact_level),
            expected_crowd_size: None,
            description: String::new(),
        }
    }
}

fn lenient_impact<'de, D>(deserializer: D) -> Result<Option<ImpactLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    // Anything but a recognised string (numbers, objects, typos) means no impact
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(s.parse().ok()),
        _ => Ok(None),
    }
}

fn default_population() -> u64 {
    DEFAULT_POPULATION
}

/// Context snapshot for one city and date window, as supplied by a context provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityContext {
    #[serde(default)]
    pub city: String,
    /// Resident count at the reference year.
    #[serde(default = "default_population")]
    pub population: u64,
    /// Climatological mean temperature for the month, °C.
    pub avg_monthly_temp: f64,
    pub industrial_zone_activity: IndustrialActivity,
    /// Events in the window. When several share a date, the first one listed wins.
    #[serde(default)]
    pub festivals: Vec<FestivalEvent>,
}

impl CityContext {
    pub fn new(population: u64, avg_monthly_temp: f64) -> Self {
        Self {
            city: String::new(),
            population,
            avg_monthly_temp,
            industrial_zone_activity: IndustrialActivity::default(),
            festivals: Vec::new(),
        }
    }

    pub fn with_festival(mut self, festival: FestivalEvent) -> Self {
        self.festivals.push(festival);
        self
    }

    pub fn with_industrial_activity(mut self, activity: IndustrialActivity) -> Self {
        self.industrial_zone_activity = activity;
        self
    }
}

/// Per-driver split of one day's demand, MLD.
///
/// Invariant: `base + weather + industrial + festival == total` of the owning record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandBreakdown {
    pub base: f64,
    pub weather: f64,
    pub industrial: f64,
    pub festival: f64,
}

impl DemandBreakdown {
    pub fn total(&self) -> f64 {
        self.base + self.weather + self.industrial + self.festival
    }
}

/// One forecast day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub display_label: String,
    /// Megalitres per day.
    pub total_demand: f64,
    pub breakdown: DemandBreakdown,
}

impl DailyForecast {
    pub fn total_litres(&self) -> f64 {
        self.total_demand * crate::defaults::LITRES_PER_ML
    }
}

/// Forecast window presets offered by the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Horizon {
    #[default]
    ShortTerm,
    MidTerm,
    Custom(usize),
}

impl Horizon {
    pub fn days(self) -> usize {
        match self {
            Self::ShortTerm => SHORT_TERM_DAYS,
            Self::MidTerm => MID_TERM_DAYS,
            Self::Custom(days) => days,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Monsoon,
    Winter,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Summer => "Summer",
            Self::Monsoon => "Monsoon",
            Self::Winter => "Winter",
        };
        f.write_str(s)
    }
}

/// Output of the linear demand model, MLD.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPrediction {
    pub total_mld: f64,
    pub base_mld: f64,
    pub temp_mld: f64,
    pub festival_mld: f64,
}

/// Which producer supplied the headline figure of an analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandSource {
    Deterministic,
    Model,
}

/// Options for the synthetic historical trend.
///
/// # Example
/// ```
/// use water_demand::HistoryOptions;
/// let opts = HistoryOptions {
///     days: 10,
///     seed: 7,
///     ..HistoryOptions::default()
/// };
/// assert_eq!(opts.baseline_mld, 202.5);
/// ```
#[derive(Clone, Debug)]
pub struct HistoryOptions {
    /// Number of points, ending at the anchor date inclusive.
    pub days: usize,
    pub seed: u64,
    /// Centre of the demand band, MLD.
    pub baseline_mld: f64,
    /// Half-width of the demand band, MLD.
    pub demand_spread: f64,
    pub temp_floor: f64,
    pub temp_spread: f64,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            days: DEFAULT_HISTORY_DAYS,
            seed: DEFAULT_HISTORY_SEED,
            baseline_mld: DEFAULT_HISTORY_BASELINE_MLD,
            demand_spread: DEFAULT_HISTORY_DEMAND_SPREAD,
            temp_floor: DEFAULT_HISTORY_TEMP_FLOOR,
            temp_spread: DEFAULT_HISTORY_TEMP_SPREAD,
        }
    }
}

/// One point of the historical trend chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub display_label: String,
    pub demand: f64,
    pub temp: f64,
}

/// Library error type.
#[derive(thiserror::Error, Debug)]
pub enum ForecastError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("malformed context payload: {0}")]
    MalformedContext(String),
    #[error("malformed reasoning payload: {0}")]
    MalformedResponse(String),
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("provider quota exhausted; retry later")]
    QuotaExhausted,
    #[error("provider failure: {0}")]
    Provider(String),
}
