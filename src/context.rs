//! Context acquisition: decoding provider payloads into [`CityContext`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::types::{CityContext, ForecastError};

/// Supplies the context snapshot for a city and date window.
///
/// Implementations typically call an external service; retries, quotas and
/// timeouts are theirs to handle.
pub trait ContextProvider {
    fn city_context(
        &self,
        city: &str,
        start: NaiveDate,
        days: usize,
    ) -> Result<CityContext, ForecastError>;
}

/// Remove Markdown code fences that generative backends wrap around JSON.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

impl CityContext {
    /// Decode a provider payload, tolerating a surrounding code fence.
    ///
    /// # Example
    /// ```
    /// use water_demand::CityContext;
    /// let ctx = CityContext::from_json(
    ///     "```json\n{\"avgMonthlyTemp\": 31.5, \"industrialZoneActivity\": \"normal\"}\n```",
    /// ).unwrap();
    /// assert_eq!(ctx.population, 1_500_000);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ForecastError> {
        let body = strip_code_fences(text);
        if body.is_empty() {
            return Err(ForecastError::MalformedContext(
                "provider returned no content".to_string(),
            ));
        }
        serde_json::from_str(body).map_err(|e| ForecastError::MalformedContext(e.to_string()))
    }
}

/// Prompt sent to a generative context provider for the given window.
pub fn context_prompt(city: &str, start: NaiveDate, days: usize) -> String {
    format!(
        "Analyze water demand context for {city} for the {days}-DAY period starting {start}. \
         Include local festivals (with YYYY-MM-DD dates and low/medium/high impact), \
         the average monthly temperature in Celsius, and the industrial zone activity \
         level (low, normal or high). Respond with JSON only."
    )
}

#[derive(Clone, Debug)]
enum Source {
    File(PathBuf),
    Inline(String),
}

/// Serves a fixed JSON payload from a file (re-read per request) or from memory.
#[derive(Clone, Debug)]
pub struct JsonContextProvider {
    source: Source,
}

impl JsonContextProvider {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_payload(payload: impl Into<String>) -> Self {
        Self {
            source: Source::Inline(payload.into()),
        }
    }

    fn payload(&self) -> Result<String, ForecastError> {
        match &self.source {
            Source::File(path) => fs::read_to_string(path).map_err(|e| {
                ForecastError::Provider(format!("reading {}: {e}", path.display()))
            }),
            Source::Inline(s) => Ok(s.clone()),
        }
    }
}

impl ContextProvider for JsonContextProvider {
    fn city_context(
        &self,
        city: &str,
        start: NaiveDate,
        days: usize,
    ) -> Result<CityContext, ForecastError> {
        debug!(city, %start, days, "loading city context");
        let mut context = CityContext::from_json(&self.payload()?)?;
        if context.city.is_empty() {
            context.city = city.to_string();
        }
        debug!(
            festivals = context.festivals.len(),
            population = context.population,
            "city context loaded"
        );
        Ok(context)
    }
}
