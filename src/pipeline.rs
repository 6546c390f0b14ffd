//! Orchestration of one dashboard analysis: context, forecast, override, reasoning.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::ContextProvider;
use crate::engine::forecast;
use crate::model::{apply_override, DemandOverride};
use crate::reasoning::{Reasoning, ReasoningProvider, ReasoningRequest};
use crate::summary::DashboardSummary;
use crate::types::{CityContext, DailyForecast, DemandSource, ForecastError, Horizon};

#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    pub city: String,
    pub start_date: NaiveDate,
    pub horizon: Horizon,
}

/// Everything the dashboard renders for one request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub context: CityContext,
    /// Deterministic engine output for the whole horizon.
    pub forecast: Vec<DailyForecast>,
    /// First day, possibly replaced by a model prediction.
    pub headline: DailyForecast,
    pub source: DemandSource,
    pub summary: DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
}

/// Runs analyses against a set of collaborators.
pub struct Analyzer<'a> {
    context: &'a dyn ContextProvider,
    demand_override: Option<&'a dyn DemandOverride>,
    reasoning: Option<&'a dyn ReasoningProvider>,
}

impl<'a> Analyzer<'a> {
    pub fn new(context: &'a dyn ContextProvider) -> Self {
        Self {
            context,
            demand_override: None,
            reasoning: None,
        }
    }

    pub fn with_override(mut self, demand_override: &'a dyn DemandOverride) -> Self {
        self.demand_override = Some(demand_override);
        self
    }

    pub fn with_reasoning(mut self, reasoning: &'a dyn ReasoningProvider) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    /// Run one analysis.
    ///
    /// A failing override falls back to the deterministic first day. Context and
    /// reasoning failures are returned as-is; no partial analysis is produced.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, ForecastError> {
        let days = request.horizon.days();
        debug!(city = %request.city, start = %request.start_date, days, "starting analysis");

        let context = self
            .context
            .city_context(&request.city, request.start_date, days)?;
        let forecast = forecast(&context, request.start_date, days)?;

        let first = &forecast[0];
        let (headline, source) = match self.demand_override {
            Some(model) => match model.predict_for(&context) {
                Ok(prediction) => (apply_override(first, &prediction), DemandSource::Model),
                Err(e) => {
                    warn!(error = %e, "demand override failed; keeping deterministic baseline");
                    (first.clone(), DemandSource::Deterministic)
                }
            },
            None => (first.clone(), DemandSource::Deterministic),
        };

        let summary =
            DashboardSummary::from_forecast(&context, &forecast)?.with_headline(&headline);

        let reasoning = match self.reasoning {
            Some(provider) => {
                let mut req =
                    ReasoningRequest::from_forecast(&context, request.start_date, &forecast)?;
                req.predicted_litres = headline.total_litres();
                Some(provider.reasoning(&req)?)
            }
            None => None,
        };

        info!(
            city = %context.city,
            days,
            headline_mld = headline.total_demand,
            source = ?source,
            "analysis complete"
        );

        Ok(Analysis {
            context,
            forecast,
            headline,
            source,
            summary,
            reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::JsonContextProvider;
    use crate::model::LinearDemandModel;
    use crate::types::ModelPrediction;
    use std::cell::RefCell;

    const PAYLOAD: &str = r#"{"avgMonthlyTemp":30,"industrialZoneActivity":"high",
        "festivals":[{"name":"Fest","date":"2025-06-04","impactLevel":"high"}]}"#;

    struct FailingOverride;

    impl DemandOverride for FailingOverride {
        fn predict_for(&self, _: &CityContext) -> Result<ModelPrediction, ForecastError> {
            Err(ForecastError::Provider("model service unreachable".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingReasoner {
        seen: RefCell<Vec<ReasoningRequest>>,
    }

    impl ReasoningProvider for RecordingReasoner {
        fn reasoning(&self, request: &ReasoningRequest) -> Result<Reasoning, ForecastError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(Reasoning {
                reasoning: "ok".to_string(),
                recommendations: vec!["monitor reservoirs".to_string()],
            })
        }
    }

    struct QuotaReasoner;

    impl ReasoningProvider for QuotaReasoner {
        fn reasoning(&self, _: &ReasoningRequest) -> Result<Reasoning, ForecastError> {
            Err(ForecastError::QuotaExhausted)
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            city: "Andheri".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            horizon: Horizon::ShortTerm,
        }
    }

    #[test]
    fn test_analyze_deterministic() {
        let provider = JsonContextProvider::from_payload(PAYLOAD);
        let reasoner = RecordingReasoner::default();
        let analysis = Analyzer::new(&provider)
            .with_reasoning(&reasoner)
            .analyze(&request())
            .unwrap();

        assert_eq!(analysis.forecast.len(), 7);
        assert_eq!(analysis.source, DemandSource::Deterministic);
        assert_eq!(analysis.headline, analysis.forecast[0]);
        assert_eq!(analysis.context.city, "Andheri");
        assert!(analysis.forecast[3].breakdown.festival > 0.0);

        let seen = reasoner.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!((seen[0].predicted_litres - analysis.forecast[0].total_litres()).abs() < 1e-3);
        assert_eq!(analysis.reasoning.unwrap().recommendations.len(), 1);
    }

    #[test]
    fn test_analyze_with_model_override() {
        let provider = JsonContextProvider::from_payload(PAYLOAD);
        let model = LinearDemandModel::new(70.0, 4.8, 40.0);
        let reasoner = RecordingReasoner::default();
        let analysis = Analyzer::new(&provider)
            .with_override(&model)
            .with_reasoning(&reasoner)
            .analyze(&request())
            .unwrap();

        assert_eq!(analysis.source, DemandSource::Model);
        assert!((analysis.headline.total_demand - 254.0).abs() < 1e-9);
        // The curve itself stays deterministic
        assert_ne!(analysis.forecast[0].total_demand, analysis.headline.total_demand);

        // Target card and attribution chart follow the headline
        let s = &analysis.summary;
        assert_eq!(s.target_mld, analysis.headline.total_demand);
        let h = analysis.headline.breakdown;
        assert!((s.attribution_litres.base - h.base * 1e6).abs() < 1e-3);
        assert!((s.attribution_litres.festival - h.festival * 1e6).abs() < 1e-3);
        assert_eq!(s.attribution_litres.industrial, 0.0);
        let volume: f64 = analysis.forecast.iter().map(|d| d.total_demand).sum();
        assert!((s.total_volume_ml - volume).abs() < 1e-9);

        let seen = reasoner.seen.borrow();
        assert!((seen[0].predicted_litres - 254.0e6).abs() < 1e-3);
    }

    #[test]
    fn test_analyze_override_failure_falls_back() {
        let provider = JsonContextProvider::from_payload(PAYLOAD);
        let analysis = Analyzer::new(&provider)
            .with_override(&FailingOverride)
            .analyze(&request())
            .unwrap();
        assert_eq!(analysis.source, DemandSource::Deterministic);
        assert_eq!(analysis.headline, analysis.forecast[0]);
        assert!(analysis.reasoning.is_none());
    }

    #[test]
    fn test_analyze_propagates_collaborator_errors() {
        let provider = JsonContextProvider::from_payload(PAYLOAD);
        assert!(matches!(
            Analyzer::new(&provider)
                .with_reasoning(&QuotaReasoner)
                .analyze(&request()),
            Err(ForecastError::QuotaExhausted)
        ));

        let broken = JsonContextProvider::from_payload("```json\n```");
        assert!(matches!(
            Analyzer::new(&broken).analyze(&request()),
            Err(ForecastError::MalformedContext(_))
        ));
    }
}
