use chrono::{Datelike, NaiveDate};

use crate::types::Season;

/// Monsoon-climate season of a calendar date: Mar-May summer, Jun-Sep monsoon,
/// the rest winter.
pub fn season_of(date: NaiveDate) -> Season {
    match date.month() {
        3..=5 => Season::Summer,
        6..=9 => Season::Monsoon,
        _ => Season::Winter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(y: i32, m: u32, d: u32) -> Season {
        season_of(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_season_boundaries() {
        assert_eq!(season(2025, 2, 28), Season::Winter);
        assert_eq!(season(2025, 3, 1), Season::Summer);
        assert_eq!(season(2025, 5, 31), Season::Summer);
        assert_eq!(season(2025, 6, 1), Season::Monsoon);
        assert_eq!(season(2025, 9, 30), Season::Monsoon);
        assert_eq!(season(2025, 10, 1), Season::Winter);
        assert_eq!(season(2025, 12, 31), Season::Winter);
    }
}
