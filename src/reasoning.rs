//! Contract with the reasoning collaborator that turns a forecast into prose.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::context::strip_code_fences;
use crate::types::{CityContext, DailyForecast, ForecastError, IndustrialActivity};

/// What the reasoning collaborator is told about an analysis.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningRequest {
    pub city: String,
    pub start_date: NaiveDate,
    pub days: usize,
    /// First forecast day's total, litres.
    pub predicted_litres: f64,
    pub festival_count: usize,
    pub industrial_activity: IndustrialActivity,
}

impl ReasoningRequest {
    /// Build a request from the forecast's first record and the full context.
    ///
    /// # Errors
    /// Returns `ForecastError::InvalidInput` if `forecast` is empty.
    pub fn from_forecast(
        context: &CityContext,
        start_date: NaiveDate,
        forecast: &[DailyForecast],
    ) -> Result<Self, ForecastError> {
        let first = forecast.first().ok_or_else(|| {
            ForecastError::InvalidInput("cannot reason about an empty forecast".to_string())
        })?;

        Ok(Self {
            city: context.city.clone(),
            start_date,
            days: forecast.len(),
            predicted_litres: first.total_litres(),
            festival_count: context.festivals.len(),
            industrial_activity: context.industrial_zone_activity,
        })
    }

    pub fn prompt(&self) -> String {
        format!(
            "Provide water management strategy for {} starting {}. \
             Total demand predicted: {:.0} liters over {} days. \
             Factors: {} festivals, {} industrial load. \
             Respond with JSON containing \"reasoning\" and \"recommendations\".",
            self.city,
            self.start_date,
            self.predicted_litres,
            self.days,
            self.festival_count,
            self.industrial_activity
        )
    }
}

/// Narrative explanation and recommended actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reasoning {
    pub reasoning: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl Reasoning {
    /// Decode a provider payload, tolerating a surrounding code fence.
    pub fn from_json(text: &str) -> Result<Self, ForecastError> {
        let body = strip_code_fences(text);
        if body.is_empty() {
            return Err(ForecastError::MalformedResponse(
                "provider returned no content".to_string(),
            ));
        }
        serde_json::from_str(body).map_err(|e| ForecastError::MalformedResponse(e.to_string()))
    }
}

pub trait ReasoningProvider {
    fn reasoning(&self, request: &ReasoningRequest) -> Result<Reasoning, ForecastError>;
}
