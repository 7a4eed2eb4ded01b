use time::{Date, OffsetDateTime, Weekday};

/// Weekday names in chronological order, Monday first. Index with
/// `Weekday::number_days_from_monday()`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// UTC calendar day of an epoch timestamp, `None` when out of range.
pub fn day_from_epoch(ts: i64) -> Option<Date> {
    OffsetDateTime::from_unix_timestamp(ts).ok().map(|dt| dt.date())
}

/// UTC hour of day (0..=23) of an epoch timestamp.
pub fn hour_from_epoch(ts: i64) -> Option<u8> {
    OffsetDateTime::from_unix_timestamp(ts).ok().map(|dt| dt.hour())
}

/// UTC weekday of an epoch timestamp.
pub fn weekday_from_epoch(ts: i64) -> Option<Weekday> {
    OffsetDateTime::from_unix_timestamp(ts).ok().map(|dt| dt.weekday())
}

pub fn weekday_name(w: Weekday) -> &'static str {
    WEEKDAY_NAMES[w.number_days_from_monday() as usize]
}

/// "YYYY-MM-DD" key used by the daily series.
pub fn format_day(day: Date) -> String {
    format!("{:04}-{:02}-{:02}", day.year(), day.month() as u8, day.day())
}

/// Inclusive iteration from `start` to `end` (if `start` <= `end`), else empty.
pub fn iter_days(start: Date, end: Date) -> impl Iterator<Item = Date> {
    let mut curr = if start <= end { Some(start) } else { None };
    std::iter::from_fn(move || {
        let ret = curr?;
        curr = ret.next_day().filter(|n| *n <= end);
        Some(ret)
    })
}
