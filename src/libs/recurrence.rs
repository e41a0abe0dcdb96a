use crate::libs::task::RecurrencePattern;
use chrono::{Days, Months, NaiveDate};

/// Date of the next occurrence of a recurring task completed on `from`.
///
/// Month and year steps use calendar arithmetic, clamping to the last day of
/// a shorter month (Jan 31 + 1 month is Feb 28/29). Returns `None` for
/// non-positive intervals or dates outside chrono's range.
pub fn next_occurrence(from: NaiveDate, pattern: RecurrencePattern, interval: i64) -> Option<NaiveDate> {
    if interval < 1 {
        return None;
    }
    let n = u32::try_from(interval).ok()?;

    match pattern {
        RecurrencePattern::Daily => from.checked_add_days(Days::new(u64::from(n))),
        RecurrencePattern::Weekly => from.checked_add_days(Days::new(u64::from(n) * 7)),
        RecurrencePattern::Monthly => from.checked_add_months(Months::new(n)),
        RecurrencePattern::Yearly => from.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn steps_by_pattern_unit() {
        let from = date(2024, 3, 15);

        assert_eq!(next_occurrence(from, RecurrencePattern::Daily, 3), Some(date(2024, 3, 18)));
        assert_eq!(next_occurrence(from, RecurrencePattern::Weekly, 2), Some(date(2024, 3, 29)));
        assert_eq!(next_occurrence(from, RecurrencePattern::Monthly, 1), Some(date(2024, 4, 15)));
        assert_eq!(next_occurrence(from, RecurrencePattern::Yearly, 1), Some(date(2025, 3, 15)));
    }

    #[test]
    fn month_end_is_clamped() {
        assert_eq!(next_occurrence(date(2024, 1, 31), RecurrencePattern::Monthly, 1), Some(date(2024, 2, 29)));
        assert_eq!(next_occurrence(date(2024, 2, 29), RecurrencePattern::Yearly, 1), Some(date(2025, 2, 28)));
    }

    #[test]
    fn non_positive_interval_has_no_next_date() {
        assert_eq!(next_occurrence(date(2024, 1, 1), RecurrencePattern::Daily, 0), None);
        assert_eq!(next_occurrence(date(2024, 1, 1), RecurrencePattern::Weekly, -2), None);
    }
}
