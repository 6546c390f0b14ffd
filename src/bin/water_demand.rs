use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use water_demand::data::parse_start_date;
use water_demand::{
    historical_trend, Analysis, AnalysisRequest, Analyzer, DailyForecast, HistoryOptions,
    Horizon, JsonContextProvider, LinearDemandModel, ReasoningRequest,
};

#[derive(Debug, Parser)]
#[command(name = "water-demand", about = "Deterministic water-demand forecasts")]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Forecast daily demand from a context snapshot
    Forecast(ForecastArgs),
    /// Print a synthetic historical trend
    History(HistoryArgs),
    /// Print the reasoning prompt for a forecast
    Prompt(WindowArgs),
}

#[derive(Debug, Args, Clone)]
struct WindowArgs {
    /// Context snapshot JSON (as returned by the context provider)
    #[arg(long)]
    context: PathBuf,
    /// First forecast day, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    start: NaiveDate,
    #[arg(long, default_value = "Andheri")]
    city: String,
    /// Horizon in days
    #[arg(long, conflicts_with = "mid_term")]
    days: Option<usize>,
    /// Use the 30-day horizon
    #[arg(long)]
    mid_term: bool,
}

impl WindowArgs {
    fn horizon(&self) -> Horizon {
        match (self.days, self.mid_term) {
            (Some(days), _) => Horizon::Custom(days),
            (None, true) => Horizon::MidTerm,
            (None, false) => Horizon::ShortTerm,
        }
    }

    fn request(&self) -> AnalysisRequest {
        AnalysisRequest {
            city: self.city.clone(),
            start_date: self.start,
            horizon: self.horizon(),
        }
    }
}

#[derive(Debug, Args, Clone)]
struct ForecastArgs {
    #[command(flatten)]
    window: WindowArgs,
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
    /// Linear model weights `intercept,temp,festival` overriding the first day
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    model: Option<Vec<f64>>,
}

#[derive(Debug, Args, Clone)]
struct HistoryArgs {
    /// Last day of the trend, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    end: NaiveDate,
    #[arg(long)]
    days: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    label: &'a str,
    total_mld: f64,
    base_mld: f64,
    weather_mld: f64,
    industrial_mld: f64,
    festival_mld: f64,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_start_date(s).map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run_forecast(args: &ForecastArgs) -> anyhow::Result<()> {
    let provider = JsonContextProvider::from_path(&args.window.context);
    let model = args
        .model
        .as_deref()
        .map(LinearDemandModel::from_coefficients)
        .transpose()
        .context("invalid --model weights")?;

    let mut analyzer = Analyzer::new(&provider);
    if let Some(model) = &model {
        analyzer = analyzer.with_override(model);
    }

    let analysis = analyzer
        .analyze(&args.window.request())
        .with_context(|| format!("analysing {}", args.window.context.display()))?;

    match args.format {
        Format::Table => print_table(&analysis),
        Format::Json => {
            serde_json::to_writer_pretty(io::stdout().lock(), &analysis)?;
            println!();
        }
        Format::Csv => write_csv(&analysis.forecast)?,
    }
    Ok(())
}

fn print_table(analysis: &Analysis) {
    let s = &analysis.summary;
    println!(
        "{} | population {} | industrial {} | {:.1}°C | {}",
        analysis.context.city,
        s.projected_population,
        s.industrial_activity,
        s.avg_monthly_temp,
        s.season
    );
    println!(
        "{:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "day", "total", "base", "weather", "industry", "festival"
    );
    for day in &analysis.forecast {
        let b = day.breakdown;
        println!(
            "{:>8} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            day.display_label, day.total_demand, b.base, b.weather, b.industrial, b.festival
        );
    }
    println!(
        "target {:.1} MLD ({:?}) | peak {:.1} MLD on {} | mean {:.1} MLD | volume {:.1} ML",
        analysis.headline.total_demand,
        analysis.source,
        s.peak_mld,
        s.peak_date,
        s.mean_mld,
        s.total_volume_ml
    );
}

fn write_csv(forecast: &[DailyForecast]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    for day in forecast {
        wtr.serialize(CsvRow {
            date: day.date.to_string(),
            label: &day.display_label,
            total_mld: day.total_demand,
            base_mld: day.breakdown.base,
            weather_mld: day.breakdown.weather,
            industrial_mld: day.breakdown.industrial,
            festival_mld: day.breakdown.festival,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn run_history(args: &HistoryArgs) -> anyhow::Result<()> {
    let defaults = HistoryOptions::default();
    let opts = HistoryOptions {
        days: args.days.unwrap_or(defaults.days),
        seed: args.seed.unwrap_or(defaults.seed),
        ..defaults
    };
    debug!(days = opts.days, seed = opts.seed, "generating history");

    for point in historical_trend(args.end, &opts)? {
        println!(
            "{:>8} {:>8.2} MLD {:>6.1}°C",
            point.display_label, point.demand, point.temp
        );
    }
    Ok(())
}

fn run_prompt(args: &WindowArgs) -> anyhow::Result<()> {
    let provider = JsonContextProvider::from_path(&args.context);
    let analysis = Analyzer::new(&provider).analyze(&args.request())?;
    let request =
        ReasoningRequest::from_forecast(&analysis.context, args.start, &analysis.forecast)?;
    println!("{}", request.prompt());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Forecast(args) => run_forecast(args),
        Command::History(args) => run_history(args),
        Command::Prompt(args) => run_prompt(args),
    }
}
