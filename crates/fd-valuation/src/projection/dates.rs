//! Fiscal year-end dates for the forecast period.

use crate::{Result, ValuationError};
use chrono::{Datelike, NaiveDate};

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Period ends of the `years` fiscal years following `last_period_end`.
///
/// Fiscal years end on the last day of the same calendar month as
/// `last_period_end`, so a June quarter end yields June 30 of each of the
/// following years.
///
/// # Errors
/// [`ValuationError::InvalidInput`] if a date falls outside chrono's range.
pub fn projection_dates(last_period_end: NaiveDate, years: usize) -> Result<Vec<NaiveDate>> {
    let month = last_period_end.month();

    (1..=years)
        .map(|offset| {
            i32::try_from(offset)
                .ok()
                .and_then(|offset| last_period_end.year().checked_add(offset))
                .and_then(|year| month_end(year, month))
                .ok_or_else(|| {
                    ValuationError::InvalidInput(format!(
                        "projection date {offset} years after {last_period_end} is out of range"
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_month_end_dates() {
        let dates = projection_dates(date(2024, 6, 30), 3).unwrap();
        assert_eq!(
            dates,
            vec![date(2025, 6, 30), date(2026, 6, 30), date(2027, 6, 30)]
        );
    }

    #[test]
    fn test_mid_month_start_rolls_to_month_end() {
        let dates = projection_dates(date(2024, 12, 15), 2).unwrap();
        assert_eq!(dates, vec![date(2025, 12, 31), date(2026, 12, 31)]);
    }

    #[test]
    fn test_february_handles_leap_years() {
        let dates = projection_dates(date(2023, 2, 28), 2).unwrap();
        assert_eq!(dates, vec![date(2024, 2, 29), date(2025, 2, 28)]);
    }

    #[test]
    fn test_zero_years() {
        assert!(projection_dates(date(2024, 6, 30), 0).unwrap().is_empty());
    }
}
