//! Company holiday calendar for premium-pay detection.
//!
//! Membership is an exact-date test. Fixed-date holidays are matched on
//! (month, day); Thanksgiving is derived as the fourth Thursday of November
//! for the trip's year.

use chrono::{Datelike, NaiveDate, Weekday};

/// Holidays pinned to a calendar date.
const FIXED_HOLIDAYS: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (7, 4, "Independence Day"),
    (12, 24, "Christmas Eve"),
    (12, 25, "Christmas"),
    (12, 31, "New Year's Eve"),
];

/// Name of the company holiday falling on `date`, if any.
pub fn holiday_name(date: NaiveDate) -> Option<&'static str> {
    for &(month, day, name) in FIXED_HOLIDAYS {
        if date.month() == month && date.day() == day {
            return Some(name);
        }
    }

    if date.month() == 11
        && let Some(thanksgiving) =
            NaiveDate::from_weekday_of_month_opt(date.year(), 11, Weekday::Thu, 4)
        && date == thanksgiving
    {
        return Some("Thanksgiving");
    }

    None
}
