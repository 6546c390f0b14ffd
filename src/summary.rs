use chrono::NaiveDate;
use serde::Serialize;

use crate::defaults::LITRES_PER_ML;
use crate::engine::population_at;
use crate::season::season_of;
use crate::types::{
    CityContext, DailyForecast, DemandBreakdown, ForecastError, IndustrialActivity, Season,
};

/// Headline figures shown above the forecast chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Population at the first forecast date, whole persons.
    pub projected_population: u64,
    pub industrial_activity: IndustrialActivity,
    pub avg_monthly_temp: f64,
    pub season: Season,
    /// Headline day's total, MLD. Follows a model override when one ran.
    pub target_mld: f64,
    pub peak_date: NaiveDate,
    pub peak_mld: f64,
    pub mean_mld: f64,
    /// Sum of daily totals over the horizon, megalitres.
    pub total_volume_ml: f64,
    /// Headline day's breakdown, litres.
    pub attribution_litres: DemandBreakdown,
}

fn in_litres(b: DemandBreakdown) -> DemandBreakdown {
    DemandBreakdown {
        base: b.base * LITRES_PER_ML,
        weather: b.weather * LITRES_PER_ML,
        industrial: b.industrial * LITRES_PER_ML,
        festival: b.festival * LITRES_PER_ML,
    }
}

impl DashboardSummary {
    /// # Errors
    /// Returns `ForecastError::InvalidInput` if `forecast` is empty.
    pub fn from_forecast(
        context: &CityContext,
        forecast: &[DailyForecast],
    ) -> Result<Self, ForecastError> {
        let first = forecast.first().ok_or_else(|| {
            ForecastError::InvalidInput("cannot summarise an empty forecast".to_string())
        })?;

        // Ties keep the earliest day
        let mut peak = first;
        for day in &forecast[1..] {
            if day.total_demand > peak.total_demand {
                peak = day;
            }
        }

        let total_volume_ml: f64 = forecast.iter().map(|d| d.total_demand).sum();

        Ok(Self {
            projected_population: population_at(context.population, first.date).round() as u64,
            industrial_activity: context.industrial_zone_activity,
            avg_monthly_temp: context.avg_monthly_temp,
            season: season_of(first.date),
            target_mld: first.total_demand,
            peak_date: peak.date,
            peak_mld: peak.total_demand,
            mean_mld: total_volume_ml / forecast.len() as f64,
            total_volume_ml,
            attribution_litres: in_litres(first.breakdown),
        })
    }

    /// Point the target and attribution at `headline`.
    ///
    /// Peak, mean and volume stay on the deterministic curve.
    pub fn with_headline(mut self, headline: &DailyForecast) -> Self {
        self.target_mld = headline.total_demand;
        self.attribution_litres = in_litres(headline.breakdown);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::forecast;
    use crate::types::{FestivalEvent, ImpactLevel};

    #[test]
    fn test_summary_figures() {
        let ctx = CityContext::new(1_500_000, 30.0)
            .with_festival(FestivalEvent::new("Fest", "2026-06-04", ImpactLevel::High));
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let days = forecast(&ctx, start, 7).unwrap();
        let s = DashboardSummary::from_forecast(&ctx, &days).unwrap();

        // 1.5M * 1.012^2
        assert_eq!(s.projected_population, 1_536_216);
        assert_eq!(s.season, Season::Monsoon);
        assert_eq!(s.target_mld, days[0].total_demand);
        assert!(days.iter().all(|d| d.total_demand <= s.peak_mld));
        assert!((s.mean_mld * 7.0 - s.total_volume_ml).abs() < 1e-9);
        assert!((s.attribution_litres.base - days[0].breakdown.base * 1e6).abs() < 1e-3);
    }

    #[test]
    fn test_summary_with_headline_keeps_curve_figures() {
        let ctx = CityContext::new(1_500_000, 30.0);
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let days = forecast(&ctx, start, 7).unwrap();
        let base = DashboardSummary::from_forecast(&ctx, &days).unwrap();

        let mut headline = days[0].clone();
        headline.breakdown = DemandBreakdown {
            base: 70.0,
            weather: 144.0,
            industrial: 0.0,
            festival: 40.0,
        };
        headline.total_demand = 254.0;

        let s = base.clone().with_headline(&headline);
        assert_eq!(s.target_mld, 254.0);
        assert!((s.attribution_litres.base - 70.0e6).abs() < 1e-3);
        assert_eq!(s.attribution_litres.industrial, 0.0);
        assert_eq!(s.peak_mld, base.peak_mld);
        assert_eq!(s.mean_mld, base.mean_mld);
        assert_eq!(s.total_volume_ml, base.total_volume_ml);
    }

    #[test]
    fn test_summary_peak_tie_keeps_earliest() {
        let ctx = CityContext::new(1_000_000, 20.0);
        // Two weekdays at 20°C have identical totals
        let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let days = forecast(&ctx, start, 2).unwrap();
        let s = DashboardSummary::from_forecast(&ctx, &days).unwrap();
        assert_eq!(s.peak_date, start);
    }

    #[test]
    fn test_summary_empty_forecast() {
        let ctx = CityContext::new(1_000_000, 20.0);
        assert!(matches!(
            DashboardSummary::from_forecast(&ctx, &[]),
            Err(ForecastError::InvalidInput(_))
        ));
    }
}
