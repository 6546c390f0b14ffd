use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::offset_date;
use crate::types::{ForecastError, HistoricalPoint, HistoryOptions};

fn validate_options(opts: &HistoryOptions) -> Result<(), ForecastError> {
    if opts.days == 0 {
        return Err(ForecastError::InvalidInput(
            "history must cover at least one day".to_string(),
        ));
    }
    if !opts.baseline_mld.is_finite() || !opts.temp_floor.is_finite() {
        return Err(ForecastError::InvalidInput(format!(
            "baseline_mld and temp_floor must be finite, got {} and {}",
            opts.baseline_mld, opts.temp_floor
        )));
    }
    if !(opts.demand_spread.is_finite() && opts.demand_spread > 0.0) {
        return Err(ForecastError::InvalidInput(format!(
            "demand_spread must be positive, got {}",
            opts.demand_spread
        )));
    }
    // rand rejects ranges whose width overflows
    let band = [
        opts.demand_spread * 2.0,
        opts.baseline_mld - opts.demand_spread,
        opts.baseline_mld + opts.demand_spread,
    ];
    if band.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidInput(format!(
            "demand band {} ± {} overflows",
            opts.baseline_mld, opts.demand_spread
        )));
    }
    if !(opts.temp_spread.is_finite() && opts.temp_spread > 0.0) {
        return Err(ForecastError::InvalidInput(format!(
            "temp_spread must be positive, got {}",
            opts.temp_spread
        )));
    }
    if !(opts.temp_floor + opts.temp_spread).is_finite() {
        return Err(ForecastError::InvalidInput(format!(
            "temperature band {} + {} overflows",
            opts.temp_floor, opts.temp_spread
        )));
    }
    Ok(())
}

/// Synthetic trailing trend for the history chart, ending at `end` inclusive.
///
/// Demand is drawn uniformly from `baseline ± demand_spread` and temperature from
/// `[temp_floor, temp_floor + temp_spread)`. The same seed always yields the same series.
///
/// # Errors
/// Returns `ForecastError::InvalidInput` for a zero-length window, non-positive or
/// non-finite parameters, a sampling band that overflows `f64`, or a window that
/// starts before the representable calendar.
pub fn historical_trend(
    end: NaiveDate,
    opts: &HistoryOptions,
) -> Result<Vec<HistoricalPoint>, ForecastError> {
    validate_options(opts)?;

    let start = end
        .checked_sub_days(Days::new((opts.days - 1) as u64))
        .ok_or_else(|| {
            ForecastError::InvalidInput(format!("{} days before {end} is out of range", opts.days))
        })?;

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut out = Vec::with_capacity(opts.days);

    for i in 0..opts.days {
        let date = offset_date(start, i)?;
        let demand = opts.baseline_mld + rng.gen_range(-opts.demand_spread..opts.demand_spread);
        let temp = opts.temp_floor + rng.gen_range(0.0..opts.temp_spread);
        out.push(HistoricalPoint {
            date,
            display_label: date.format("%b %-d").to_string(),
            demand,
            temp,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_history_window_and_bounds() {
        let opts = HistoryOptions::default();
        let points = historical_trend(end(), &opts).unwrap();
        assert_eq!(points.len(), 15);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 5, 18).unwrap());
        assert_eq!(points[14].date, end());
        assert_eq!(points[14].display_label, "Jun 1");
        for p in &points {
            assert!(p.demand >= 192.5 && p.demand < 212.5);
            assert!(p.temp >= 28.0 && p.temp < 33.0);
        }
    }

    #[test]
    fn test_history_seeded_is_reproducible() {
        let opts = HistoryOptions::default();
        let a = historical_trend(end(), &opts).unwrap();
        let b = historical_trend(end(), &opts).unwrap();
        assert_eq!(a, b);

        let other = HistoryOptions {
            seed: 43,
            ..HistoryOptions::default()
        };
        let c = historical_trend(end(), &other).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_history_rejects_bad_options() {
        let zero = HistoryOptions {
            days: 0,
            ..HistoryOptions::default()
        };
        assert!(matches!(
            historical_trend(end(), &zero),
            Err(ForecastError::InvalidInput(_))
        ));

        let flat = HistoryOptions {
            demand_spread: 0.0,
            ..HistoryOptions::default()
        };
        assert!(matches!(
            historical_trend(end(), &flat),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_history_rejects_non_finite_and_overflowing_ranges() {
        let cases = [
            HistoryOptions {
                baseline_mld: f64::NAN,
                ..HistoryOptions::default()
            },
            HistoryOptions {
                temp_floor: f64::INFINITY,
                ..HistoryOptions::default()
            },
            HistoryOptions {
                demand_spread: 1e308,
                ..HistoryOptions::default()
            },
            HistoryOptions {
                baseline_mld: f64::MAX,
                demand_spread: 1e300,
                ..HistoryOptions::default()
            },
            HistoryOptions {
                temp_floor: f64::MAX,
                temp_spread: 1e300,
                ..HistoryOptions::default()
            },
        ];
        for opts in &cases {
            assert!(
                matches!(historical_trend(end(), opts), Err(ForecastError::InvalidInput(_))),
                "{opts:?}"
            );
        }
    }
}
