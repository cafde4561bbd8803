//! Month-of-year filtering for transaction queries.
//!
//! Queries select records by the month of their sale date regardless of the
//! year. A month filter is expressed as an inclusive range of month-day pairs,
//! e.g. March 1 to March 31, which maps directly onto an SQL `BETWEEN` over
//! the `MM-DD HH:MM:SS.SSS` part of the stored UTC date.

use std::{fmt::Display, str::FromStr};

use time::Month;

use crate::Error;

/// How a month name is turned into a range of days.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilterMode {
    /// Every day of the calendar month, including February 29.
    #[default]
    Calendar,
    /// Day 1 through "day 31" of the month, where day 31 of a shorter month
    /// overflows into the first days of the following month. Only midnight of
    /// that last day is included. February is taken to have 28 days, so
    /// February covers February 1 up to midnight at the start of March 3.
    Legacy,
}

impl FromStr for MonthFilterMode {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "calendar" => Ok(Self::Calendar),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!(
                "unknown month filter mode \"{other}\", expected \"calendar\" or \"legacy\""
            )),
        }
    }
}

impl Display for MonthFilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar => write!(f, "calendar"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// An inclusive range of days of the year that ignores the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDayRange {
    /// The first month and day in the range.
    pub start: (Month, u8),
    /// The last month and day in the range.
    pub end: (Month, u8),
    /// Whether every time of the last day is in the range. When false only
    /// midnight (00:00:00.000) of the last day is.
    pub whole_end_day: bool,
}

impl MonthDayRange {
    /// The days selected by `month` under `mode`.
    pub fn for_month(month: Month, mode: MonthFilterMode) -> Self {
        match mode {
            MonthFilterMode::Calendar => Self {
                start: (month, 1),
                end: (month, longest_month_length(month)),
                whole_end_day: true,
            },
            MonthFilterMode::Legacy => {
                let length = month_length_in_common_year(month);
                let end = if length >= 31 {
                    (month, 31)
                } else {
                    (month.next(), 31 - length)
                };

                Self {
                    start: (month, 1),
                    end,
                    whole_end_day: false,
                }
            }
        }
    }

    /// Whether `date_time` falls inside the range, ignoring its year.
    #[cfg(test)]
    pub fn contains(&self, date_time: time::OffsetDateTime) -> bool {
        let date_time = date_time.to_offset(time::UtcOffset::UTC);
        let key = format!(
            "{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
            date_time.month() as u8,
            date_time.day(),
            date_time.hour(),
            date_time.minute(),
            date_time.second(),
            date_time.millisecond()
        );
        let (start, end) = self.sql_bounds();

        start <= key && key <= end
    }

    /// The range bounds formatted as `MM-DD HH:MM:SS.SSS` for comparing
    /// against `strftime('%m-%d %H:%M:%f', ...)` in SQLite.
    pub(crate) fn sql_bounds(&self) -> (String, String) {
        let (start_month, start_day) = self.start;
        let (end_month, end_day) = self.end;
        let end_time = if self.whole_end_day {
            "23:59:59.999"
        } else {
            "00:00:00.000"
        };

        (
            format!("{:02}-{:02} 00:00:00.000", start_month as u8, start_day),
            format!("{:02}-{:02} {end_time}", end_month as u8, end_day),
        )
    }
}

fn month_length_in_common_year(month: Month) -> u8 {
    match month {
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

fn longest_month_length(month: Month) -> u8 {
    match month {
        Month::February => 29,
        other => month_length_in_common_year(other),
    }
}

/// Parse a month from a full name ("March"), a three-letter abbreviation
/// ("mar") or a month number ("3"). Names are case-insensitive.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `text` is none of the above.
pub fn parse_month(text: &str) -> Result<Month, Error> {
    let trimmed = text.trim();

    if let Ok(number) = trimmed.parse::<u8>() {
        return Month::try_from(number).map_err(|_| Error::InvalidMonth(text.to_owned()));
    }

    let lowercase = trimmed.to_ascii_lowercase();
    let month = match lowercase.as_str() {
        "january" | "jan" => Month::January,
        "february" | "feb" => Month::February,
        "march" | "mar" => Month::March,
        "april" | "apr" => Month::April,
        "may" => Month::May,
        "june" | "jun" => Month::June,
        "july" | "jul" => Month::July,
        "august" | "aug" => Month::August,
        "september" | "sep" | "sept" => Month::September,
        "october" | "oct" => Month::October,
        "november" | "nov" => Month::November,
        "december" | "dec" => Month::December,
        _ => return Err(Error::InvalidMonth(text.to_owned())),
    };

    Ok(month)
}

/// Turn the optional `month` query parameter into a day range.
///
/// A missing or blank month means "no month filter".
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is present but not a month.
pub fn month_range_from_query(
    month: Option<&str>,
    mode: MonthFilterMode,
) -> Result<Option<MonthDayRange>, Error> {
    match month {
        Some(text) if !text.trim().is_empty() => {
            parse_month(text).map(|month| Some(MonthDayRange::for_month(month, mode)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::datetime};

    use crate::Error;

    use super::{MonthDayRange, MonthFilterMode, month_range_from_query, parse_month};

    #[test]
    fn parses_names_abbreviations_and_numbers() {
        assert_eq!(parse_month("March"), Ok(Month::March));
        assert_eq!(parse_month("march"), Ok(Month::March));
        assert_eq!(parse_month("MAR"), Ok(Month::March));
        assert_eq!(parse_month("3"), Ok(Month::March));
        assert_eq!(parse_month(" December "), Ok(Month::December));
        assert_eq!(parse_month("sept"), Ok(Month::September));
    }

    #[test]
    fn rejects_unknown_months() {
        assert_eq!(
            parse_month("Smarch"),
            Err(Error::InvalidMonth("Smarch".to_owned()))
        );
        assert_eq!(parse_month("13"), Err(Error::InvalidMonth("13".to_owned())));
        assert_eq!(parse_month("0"), Err(Error::InvalidMonth("0".to_owned())));
    }

    #[test]
    fn calendar_range_covers_whole_month() {
        let range = MonthDayRange::for_month(Month::April, MonthFilterMode::Calendar);

        assert_eq!(range.start, (Month::April, 1));
        assert_eq!(range.end, (Month::April, 30));
        assert!(range.contains(datetime!(2021-04-01 00:00 UTC)));
        assert!(range.contains(datetime!(1999-04-30 23:59:59 UTC)));
        assert!(!range.contains(datetime!(2021-05-01 00:00 UTC)));
        assert!(!range.contains(datetime!(2021-03-31 23:59 UTC)));
    }

    #[test]
    fn calendar_february_includes_leap_day() {
        let range = MonthDayRange::for_month(Month::February, MonthFilterMode::Calendar);

        assert!(range.contains(datetime!(2024-02-29 12:00 UTC)));
        assert!(!range.contains(datetime!(2024-03-01 00:00 UTC)));
    }

    #[test]
    fn legacy_range_overflows_short_months() {
        let february = MonthDayRange::for_month(Month::February, MonthFilterMode::Legacy);
        let april = MonthDayRange::for_month(Month::April, MonthFilterMode::Legacy);
        let december = MonthDayRange::for_month(Month::December, MonthFilterMode::Legacy);

        assert_eq!(february.end, (Month::March, 3));
        assert!(february.contains(datetime!(2021-03-03 00:00 UTC)));
        assert!(!february.contains(datetime!(2021-03-03 10:00 UTC)));
        assert!(!february.contains(datetime!(2021-03-04 00:00 UTC)));
        assert_eq!(april.end, (Month::May, 1));
        assert_eq!(december.end, (Month::December, 31));
    }

    #[test]
    fn sql_bounds_are_zero_padded() {
        let range = MonthDayRange::for_month(Month::March, MonthFilterMode::Calendar);

        assert_eq!(
            range.sql_bounds(),
            (
                "03-01 00:00:00.000".to_owned(),
                "03-31 23:59:59.999".to_owned()
            )
        );
    }

    #[test]
    fn legacy_range_ends_at_midnight_of_last_day() {
        let march = MonthDayRange::for_month(Month::March, MonthFilterMode::Legacy);
        let april = MonthDayRange::for_month(Month::April, MonthFilterMode::Legacy);

        assert!(march.contains(datetime!(2001-03-31 00:00 UTC)));
        assert!(!march.contains(datetime!(2001-03-31 12:00 UTC)));
        assert!(april.contains(datetime!(2001-05-01 00:00 UTC)));
        assert!(!april.contains(datetime!(2001-05-01 12:00 UTC)));
        assert!(april.contains(datetime!(2001-04-30 23:59 UTC)));
        assert_eq!(april.sql_bounds().1, "05-01 00:00:00.000");
    }

    #[test]
    fn blank_month_means_no_filter() {
        assert_eq!(month_range_from_query(None, MonthFilterMode::Calendar), Ok(None));
        assert_eq!(
            month_range_from_query(Some(""), MonthFilterMode::Calendar),
            Ok(None)
        );
        assert!(month_range_from_query(Some("June"), MonthFilterMode::Calendar)
            .unwrap()
            .is_some());
    }

    #[test]
    fn parses_filter_mode() {
        assert_eq!("legacy".parse::<MonthFilterMode>(), Ok(MonthFilterMode::Legacy));
        assert_eq!("Calendar".parse::<MonthFilterMode>(), Ok(MonthFilterMode::Calendar));
        assert!("yearly".parse::<MonthFilterMode>().is_err());
        assert_eq!(MonthFilterMode::Legacy.to_string(), "legacy");
    }
}
