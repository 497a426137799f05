//! Date-of-birth formatting and birthday arithmetic.

use chrono::{Datelike, NaiveDate};

/// Format of the stored date of birth, e.g. `2006-01-02`.
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

/// Formats a date the way dates of birth are stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_OF_BIRTH_FORMAT).to_string()
}

/// Parses a stored date of birth.
pub fn parse_date_of_birth(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_OF_BIRTH_FORMAT).ok()
}

/// The birthday of someone born on `born` in the given year.
///
/// Feb 29 birthdays fall on Mar 1 in non-leap years.
fn anniversary(born: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, born.month(), born.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Days from `today` until the next birthday of someone born on `born`.
///
/// Returns 0 when the birthday is today.
pub fn days_until_birthday(born: NaiveDate, today: NaiveDate) -> Option<u32> {
    let this_year = anniversary(born, today.year())?;
    let next = if this_year < today {
        anniversary(born, today.year() + 1)?
    } else {
        this_year
    };

    u32::try_from((next - today).num_days()).ok()
}
