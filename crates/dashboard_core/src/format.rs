//! Display formatting in the dashboard's French locale.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::aggregate::parse_float_prefix;

const WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];
const WEEKDAYS_SHORT: [&str; 7] = ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."];
const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// One decimal, with exact ties rounded away from zero the way the page's
/// `toFixed(1)` does. `-0.0` prints as `0.0`.
pub fn fixed1(value: f64) -> String {
    let value = value + 0.0;
    // Only multiples of 0.25 with an odd quarter count sit exactly on a tie.
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", value + 0.05_f64.copysign(value));
    }
    format!("{value:.1}")
}

/// Hours cell of the table: one decimal when the cell starts with a number,
/// otherwise the raw text, or `"0"` for an empty cell.
pub fn hours_cell(raw: &str) -> String {
    match parse_float_prefix(raw) {
        Some(value) if value.is_finite() => fixed1(value),
        _ if raw.is_empty() => "0".to_string(),
        _ => raw.to_string(),
    }
}

/// Parses the timestamp formats found in the announcements sheet.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return local_to_utc(parsed);
        }
    }
    for pattern in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, pattern) {
            return local_to_utc(date.and_hms_opt(0, 0, 0)?);
        }
    }
    None
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// `"mardi 13 octobre"`, or the raw value when it is not a date.
pub fn long_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(instant) => {
            let local = instant.with_timezone(&Local);
            format!(
                "{} {:02} {}",
                WEEKDAYS[local.weekday().num_days_from_monday() as usize],
                local.day(),
                MONTHS[local.month0() as usize]
            )
        }
        None => raw.to_string(),
    }
}

/// Header clock text, e.g. `"mar. 09:05"`.
pub fn clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!(
        "{} {:02}:{:02}",
        WEEKDAYS_SHORT[now.weekday().num_days_from_monday() as usize],
        now.hour(),
        now.minute()
    )
}

/// Rounds half toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
