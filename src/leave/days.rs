//! Leave day counting.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Counts the calendar days from `start` to `end`, inclusive of both.
///
/// Weekends and public holidays are counted like any other day.
///
/// # Examples
///
/// ```
/// use kenya_payroll_engine::leave::inclusive_day_count;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 29).unwrap();
/// assert_eq!(inclusive_day_count(start, end).unwrap(), 5);
/// ```
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> Result<u32, ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart {
            start_date: start,
            end_date: end,
        });
    }
    let days = (end - start).num_days() + 1;
    Ok(u32::try_from(days).unwrap_or(u32::MAX))
}
