use water_demand::{forecast_from_str, CityContext, FestivalEvent, ImpactLevel};

fn main() {
    let context = CityContext::new(1_500_000, 30.0)
        .with_festival(FestivalEvent::new("Procession", "2025-06-04", ImpactLevel::High));

    let days = forecast_from_str(&context, "2025-06-01", 7).unwrap();

    println!("7-day forecast:");
    for day in &days {
        let b = day.breakdown;
        println!(
            "  {:>6}: {:7.2} MLD  base {:.2}  weather {:.2}  industrial {:.2}  festival {:.2}",
            day.display_label, day.total_demand, b.base, b.weather, b.industrial, b.festival
        );
    }
}
