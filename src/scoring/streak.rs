use chrono::NaiveDate;

/// Day-boundary streak rule. Days are calendar days in UTC, the service's
/// single reference time zone.
///
/// First match wins:
/// * same day as the last correct answer: unchanged (a same-day repeat must
///   not double-increment)
/// * exactly the next day: streak + 1
/// * any larger gap, or no prior correct answer at all: reset to 1
pub fn next_streak(current: i64, last_activity_day: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match last_activity_day {
        Some(last) if last == today => current,
        Some(last) if last.succ_opt() == Some(today) => current + 1,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_keeps_streak() {
        let today = day(2025, 3, 10);
        for current in [0, 1, 7, 365] {
            assert_eq!(next_streak(current, Some(today), today), current);
        }
    }

    #[test]
    fn test_next_day_increments() {
        assert_eq!(next_streak(1, Some(day(2025, 3, 10)), day(2025, 3, 11)), 2);
        assert_eq!(next_streak(9, Some(day(2025, 3, 10)), day(2025, 3, 11)), 10);
    }

    #[test]
    fn test_gap_resets_to_one() {
        assert_eq!(next_streak(5, Some(day(2025, 3, 10)), day(2025, 3, 12)), 1);
        assert_eq!(next_streak(5, Some(day(2025, 3, 10)), day(2025, 4, 9)), 1);
    }

    #[test]
    fn test_no_prior_day_resets_to_one() {
        assert_eq!(next_streak(0, None, day(2025, 3, 10)), 1);
        assert_eq!(next_streak(7, None, day(2025, 3, 10)), 1);
    }

    #[test]
    fn test_increment_across_month_boundary() {
        assert_eq!(next_streak(3, Some(day(2025, 1, 31)), day(2025, 2, 1)), 4);
        assert_eq!(next_streak(3, Some(day(2024, 12, 31)), day(2025, 1, 1)), 4);
    }
}
