//! Linear demand model and the override strategy applied on top of the engine.
//!
//! The engine always produces the deterministic baseline. An orchestration layer
//! may swap the headline day for a model prediction via [`apply_override`].

use ndarray::Array1;

use crate::types::{
    CityContext, DailyForecast, DemandBreakdown, ForecastError, ImpactLevel, ModelPrediction,
};

/// Produces a demand prediction from a context snapshot.
pub trait DemandOverride {
    fn predict_for(&self, context: &CityContext) -> Result<ModelPrediction, ForecastError>;
}

/// Pre-fitted linear model: `demand = w0 + w1 * temp + w2 * festival`.
///
/// Inference only. Weights come from an offline fit.
///
/// # Example
/// ```
/// use water_demand::LinearDemandModel;
/// let model = LinearDemandModel::from_coefficients(&[70.0, 4.8, 40.0]).unwrap();
/// let p = model.predict(30.0, true);
/// assert!((p.total_mld - 254.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LinearDemandModel {
    weights: Array1<f64>,
}

impl LinearDemandModel {
    pub fn new(intercept: f64, temperature_weight: f64, festival_weight: f64) -> Self {
        Self {
            weights: Array1::from(vec![intercept, temperature_weight, festival_weight]),
        }
    }

    /// Build from `[intercept, temperature_weight, festival_weight]`.
    ///
    /// # Errors
    /// Returns `ForecastError::InvalidModel` unless exactly three finite weights are given.
    pub fn from_coefficients(coeffs: &[f64]) -> Result<Self, ForecastError> {
        if coeffs.len() != 3 {
            return Err(ForecastError::InvalidModel(format!(
                "expected 3 coefficients, got {}",
                coeffs.len()
            )));
        }
        if let Some(bad) = coeffs.iter().find(|c| !c.is_finite()) {
            return Err(ForecastError::InvalidModel(format!(
                "coefficient {bad} is not finite"
            )));
        }
        Ok(Self::new(coeffs[0], coeffs[1], coeffs[2]))
    }

    pub fn coefficients(&self) -> &[f64] {
        self.weights.as_slice().unwrap_or(&[])
    }

    /// Predict daily demand, MLD, with the per-feature contributions.
    pub fn predict(&self, temperature: f64, is_festival: bool) -> ModelPrediction {
        let features = Array1::from(vec![1.0, temperature, if is_festival { 1.0 } else { 0.0 }]);
        let parts = &self.weights * &features;

        ModelPrediction {
            total_mld: self.weights.dot(&features),
            base_mld: parts[0],
            temp_mld: parts[1],
            festival_mld: parts[2],
        }
    }
}

impl DemandOverride for LinearDemandModel {
    fn predict_for(&self, context: &CityContext) -> Result<ModelPrediction, ForecastError> {
        Ok(self.predict(context.avg_monthly_temp, has_major_festival(context)))
    }
}

/// True if any festival in the window is rated medium or high.
pub fn has_major_festival(context: &CityContext) -> bool {
    context
        .festivals
        .iter()
        .any(|f| matches!(f.impact_level, Some(ImpactLevel::Medium | ImpactLevel::High)))
}

/// Replace a day's figures with a model prediction.
///
/// The model has no industrial term, so that component becomes zero; the total is
/// recomputed from the breakdown so the sum invariant holds.
pub fn apply_override(day: &DailyForecast, prediction: &ModelPrediction) -> DailyForecast {
    let breakdown = DemandBreakdown {
        base: prediction.base_mld,
        weather: prediction.temp_mld,
        industrial: 0.0,
        festival: prediction.festival_mld,
    };

    DailyForecast {
        date: day.date,
        display_label: day.display_label.clone(),
        total_demand: breakdown.total(),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FestivalEvent;
    use chrono::NaiveDate;

    #[test]
    fn test_predict_decomposes() {
        let model = LinearDemandModel::new(70.0, 4.8, 40.0);
        let p = model.predict(30.0, false);
        assert!((p.base_mld - 70.0).abs() < 1e-12);
        assert!((p.temp_mld - 144.0).abs() < 1e-12);
        assert_eq!(p.festival_mld, 0.0);
        assert!((p.total_mld - (p.base_mld + p.temp_mld + p.festival_mld)).abs() < 1e-9);
    }

    #[test]
    fn test_from_coefficients_validation() {
        assert!(matches!(
            LinearDemandModel::from_coefficients(&[1.0, 2.0]),
            Err(ForecastError::InvalidModel(_))
        ));
        assert!(matches!(
            LinearDemandModel::from_coefficients(&[1.0, f64::NAN, 2.0]),
            Err(ForecastError::InvalidModel(_))
        ));
        let m = LinearDemandModel::from_coefficients(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.coefficients(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_has_major_festival() {
        let ctx = CityContext::new(1_500_000, 30.0)
            .with_festival(FestivalEvent::new("Fair", "2025-06-02", ImpactLevel::Low));
        assert!(!has_major_festival(&ctx));
        let ctx = ctx.with_festival(FestivalEvent::new("Fest", "2025-06-03", ImpactLevel::Medium));
        assert!(has_major_festival(&ctx));
    }

    #[test]
    fn test_override_uses_context() {
        let model = LinearDemandModel::new(70.0, 4.8, 40.0);
        let ctx = CityContext::new(1_500_000, 30.0)
            .with_festival(FestivalEvent::new("Fest", "2025-06-03", ImpactLevel::High));
        let p = model.predict_for(&ctx).unwrap();
        assert!((p.festival_mld - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_override_keeps_invariant() {
        let day = DailyForecast {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            display_label: "Jun 1".to_string(),
            total_demand: 230.0,
            breakdown: DemandBreakdown {
                base: 200.0,
                weather: 5.0,
                industrial: 25.0,
                festival: 0.0,
            },
        };
        let p = LinearDemandModel::new(70.0, 4.8, 40.0).predict(31.0, true);
        let out = apply_override(&day, &p);
        assert_eq!(out.date, day.date);
        assert_eq!(out.display_label, "Jun 1");
        assert_eq!(out.breakdown.industrial, 0.0);
        assert!((out.total_demand - p.total_mld).abs() < 1e-9);
        assert!((out.breakdown.total() - out.total_demand).abs() < 1e-12);
    }
}
