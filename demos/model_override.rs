use chrono::NaiveDate;
use water_demand::{AnalysisRequest, Analyzer, Horizon, JsonContextProvider, LinearDemandModel};

fn main() -> Result<(), water_demand::ForecastError> {
    let provider = JsonContextProvider::from_path("data/andheri_context.json");
    let model = LinearDemandModel::from_coefficients(&[70.0, 4.8, 40.0])?;

    let request = AnalysisRequest {
        city: "Andheri".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        horizon: Horizon::ShortTerm,
    };

    let baseline = Analyzer::new(&provider).analyze(&request)?;
    let overridden = Analyzer::new(&provider).with_override(&model).analyze(&request)?;

    println!("Deterministic first day: {:.2} MLD", baseline.headline.total_demand);
    println!(
        "Model first day:         {:.2} MLD ({:?})",
        overridden.headline.total_demand, overridden.source
    );
    println!(
        "Peak over window:        {:.2} MLD on {}",
        baseline.summary.peak_mld, baseline.summary.peak_date
    );

    Ok(())
}
