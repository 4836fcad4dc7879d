use chrono::{Datelike as _, Months, NaiveDate};

/// Inclusive first and last day of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap();
    let end = start
        .checked_add_months(Months::new(1)).unwrap()
        .pred_opt().unwrap();

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2026, 6, 17).unwrap());

        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
    }

    #[test]
    fn test_month_bounds_february() {
        let (_, end) = month_bounds(NaiveDate::from_ymd_opt(2026, 2, 3).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());

        let (_, leap_end) = month_bounds(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert_eq!(leap_end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_month_bounds_december_wraps_year() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
