//! Calendar formatting shared by models, filters and exports.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month, Time, Weekday};

use crate::ParseError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");
time::serde::format_description!(pub clock_time, Time, "[hour]:[minute]");

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [`ParseError::InvalidFormat`] when the input is not an ISO calendar date.
pub fn parse_date(input: &str) -> Result<Date, ParseError> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| ParseError::InvalidFormat {
        kind: "date",
        input: input.to_owned(),
        expected: "YYYY-MM-DD",
    })
}

/// Parse an `HH:MM` wall-clock time.
///
/// # Errors
/// Returns [`ParseError::InvalidFormat`] when the input is not a 24h time.
pub fn parse_time(input: &str) -> Result<Time, ParseError> {
    Time::parse(input.trim(), TIME_FORMAT).map_err(|_| ParseError::InvalidFormat {
        kind: "time",
        input: input.to_owned(),
        expected: "HH:MM",
    })
}

/// `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// `HH:MM`.
#[must_use]
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Long Indonesian date, e.g. `Senin, 2 September 2024`.
#[must_use]
pub fn format_long_date(date: Date) -> String {
    format!(
        "{}, {} {} {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date.month()),
        date.year()
    )
}

const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Senin",
        Weekday::Tuesday => "Selasa",
        Weekday::Wednesday => "Rabu",
        Weekday::Thursday => "Kamis",
        Weekday::Friday => "Jumat",
        Weekday::Saturday => "Sabtu",
        Weekday::Sunday => "Minggu",
    }
}

const fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Januari",
        Month::February => "Februari",
        Month::March => "Maret",
        Month::April => "April",
        Month::May => "Mei",
        Month::June => "Juni",
        Month::July => "Juli",
        Month::August => "Agustus",
        Month::September => "September",
        Month::October => "Oktober",
        Month::November => "November",
        Month::December => "Desember",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn parses_iso_dates_and_clock_times() {
        let parsed = parse_date(" 2024-09-01 ").unwrap_or_else(|err| panic!("date: {err}"));
        assert_eq!(parsed, date!(2024 - 09 - 01));
        let parsed = parse_time("09:30").unwrap_or_else(|err| panic!("time: {err}"));
        assert_eq!(parsed, time!(09:30));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_date("01/09/2024").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn long_date_uses_indonesian_names() {
        assert_eq!(format_long_date(date!(2024 - 09 - 02)), "Senin, 2 September 2024");
        assert_eq!(format_long_date(date!(2024 - 08 - 17)), "Sabtu, 17 Agustus 2024");
    }

    #[test]
    fn short_formats_pad_fields() {
        assert_eq!(format_date(date!(2024 - 01 - 05)), "2024-01-05");
        assert_eq!(format_time(time!(07:05)), "07:05");
    }
}
