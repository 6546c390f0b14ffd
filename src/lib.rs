//! # water_demand
//!
//! Deterministic municipal water-demand forecasting with an auditable per-driver breakdown.
//!
//! The core is [`forecast`]: a pure function from a [`CityContext`] snapshot, a start
//! date and a horizon to one [`DailyForecast`] per day. Each day's demand (MLD) is split
//! into four drivers:
//!
//! * **base**: population (compounded 1.2%/yr from 2024) × 135 litres per capita
//! * **weather**: 4% of base per °C above 28 °C, using a day-of-month temperature swing
//! * **industrial**: 12% of base at 95% load on weekdays, 40% on Sundays
//! * **festival**: 2% / 8% / 15% of base for a low / medium / high impact event that day
//!
//! Around the engine sit the collaborator contracts of the dashboard: context decoding
//! ([`ContextProvider`]), an optional model override ([`DemandOverride`]), narrative
//! reasoning ([`ReasoningProvider`]) and the [`Analyzer`] that wires them together.
//!
//! ## Example
//!
//! ```
//! use water_demand::{forecast_from_str, CityContext, FestivalEvent, ImpactLevel};
//!
//! let context = CityContext::new(1_500_000, 30.0)
//!     .with_festival(FestivalEvent::new("Ganesh Chaturthi", "2025-06-04", ImpactLevel::High));
//!
//! let days = forecast_from_str(&context, "2025-06-01", 7).unwrap();
//! assert_eq!(days.len(), 7);
//!
//! for day in &days {
//!     let b = day.breakdown;
//!     println!(
//!         "{:>6}  {:7.2} MLD  (base {:.2}, weather {:.2}, industrial {:.2}, festival {:.2})",
//!         day.display_label, day.total_demand, b.base, b.weather, b.industrial, b.festival
//!     );
//! }
//! ```

// Module declarations
pub mod context;
pub mod data;
pub mod defaults;
pub mod engine;
pub mod history;
pub mod model;
pub mod pipeline;
pub mod reasoning;
pub mod season;
pub mod summary;
mod types;

// Re-export public types
pub use types::{
    CityContext, DailyForecast, DemandBreakdown, DemandSource, FestivalEvent, ForecastError,
    HistoricalPoint, HistoryOptions, Horizon, ImpactLevel, IndustrialActivity, ModelPrediction,
    Season,
};

// Re-export main public functions
pub use context::{context_prompt, ContextProvider, JsonContextProvider};
pub use engine::{forecast, forecast_from_str};
pub use history::historical_trend;
pub use model::{apply_override, has_major_festival, DemandOverride, LinearDemandModel};
pub use pipeline::{Analysis, AnalysisRequest, Analyzer};
pub use reasoning::{Reasoning, ReasoningProvider, ReasoningRequest};
pub use season::season_of;
pub use summary::DashboardSummary;
