//! Writes a 30-day forecast to a timestamped CSV file.
//!
//! Run with: cargo run --example mid_term_csv

use std::fs::File;

use chrono::Local;
use water_demand::{forecast, CityContext, Horizon, IndustrialActivity};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let context = CityContext::new(1_500_000, 33.0)
        .with_industrial_activity(IndustrialActivity::Normal);
    let start = chrono::NaiveDate::from_ymd_opt(2026, 4, 1).ok_or("bad date")?;
    let days = forecast(&context, start, Horizon::MidTerm.days())?;

    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("mid_term_forecast_{}.csv", timestamp);
    let mut wtr = csv::Writer::from_writer(File::create(&filename)?);

    wtr.write_record(["date", "label", "total", "base", "weather", "industrial", "festival"])?;
    for day in &days {
        let b = day.breakdown;
        wtr.write_record(&[
            day.date.to_string(),
            day.display_label.clone(),
            format!("{:.4}", day.total_demand),
            format!("{:.4}", b.base),
            format!("{:.4}", b.weather),
            format!("{:.4}", b.industrial),
            format!("{:.4}", b.festival),
        ])?;
    }
    wtr.flush()?;

    println!("Wrote {} days to {}", days.len(), filename);
    Ok(())
}
