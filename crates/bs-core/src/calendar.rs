//! Calendar-day arithmetic.

use chrono::NaiveDate;

use crate::{CoreError, CoreResult};

/// Whole days from `base` to `target`, ignoring time of day.
///
/// Negative when `target` precedes `base`. Callers that require a forward
/// range should use [`checked_day_offset`].
pub fn day_offset(target: NaiveDate, base: NaiveDate) -> i64 {
    target.signed_duration_since(base).num_days()
}

pub fn checked_day_offset(target: NaiveDate, base: NaiveDate) -> CoreResult<i64> {
    let day = day_offset(target, base);
    if day < 0 {
        return Err(CoreError::InvalidRange {
            what: "end date precedes start date",
            day,
        });
    }
    Ok(day)
}

/// Every calendar day from `from` to `to`, both inclusive. Empty when the
/// range is reversed.
pub fn dates_inclusive(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|d| *d <= to).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_is_zero() {
        assert_eq!(day_offset(date(2024, 5, 1), date(2024, 5, 1)), 0);
    }

    #[test]
    fn offsets_cross_month_and_year() {
        assert_eq!(day_offset(date(2024, 3, 1), date(2024, 2, 28)), 2);
        assert_eq!(day_offset(date(2025, 1, 1), date(2024, 12, 31)), 1);
    }

    #[test]
    fn reversed_range_is_negative() {
        assert_eq!(day_offset(date(2024, 1, 1), date(2024, 1, 3)), -2);
        assert!(matches!(
            checked_day_offset(date(2024, 1, 1), date(2024, 1, 3)),
            Err(CoreError::InvalidRange { day: -2, .. })
        ));
    }

    #[test]
    fn inclusive_dates() {
        let days = dates_inclusive(date(2024, 1, 30), date(2024, 2, 2));
        assert_eq!(days.len(), 4);
        assert_eq!(days[3], date(2024, 2, 2));
        assert!(dates_inclusive(date(2024, 2, 2), date(2024, 1, 30)).is_empty());
    }
}
