use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// A whole string that is one clock time: `8:30`, `08:30`, `8:30 am`, `8:30PM`
static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d{1,2}):(\d{2})\s*(am|pm)?\s*$").unwrap());

/// A whole string that is one time range: `10:00 - 11:30`, `10:00-11:30`
static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\d{1,2}:\d{2}(?:\s*(?:am|pm)\b)?)\s*-\s*(\d{1,2}:\d{2}(?:\s*(?:am|pm)\b)?)\s*$",
    )
    .unwrap()
});

/// List-item line whose content starts with a time or time range.
/// `prefix` is the indent + `- ` + optional checkbox; `rest` is the body.
static LEADING_TIMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<prefix>\s*- (?:\[.\] )?)(?P<start>\d{1,2}:\d{2}(?:\s*(?:am|pm)\b)?)(?:\s*-\s*(?P<end>\d{1,2}:\d{2}(?:\s*(?:am|pm)\b)?))?:?\s*(?P<rest>.*)$",
    )
    .unwrap()
});

/// Any list-item prefix: indent + `- ` + optional checkbox
static LIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*- (?:\[.\] )?").unwrap());

/// `⏳ 2025-05-10` pending-day marker
static PENDING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"⏳\s*(\d{4}-\d{2}-\d{2})").unwrap());

/// `[scheduled:: 2025-05-10]` inline-field marker
static SCHEDULED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[scheduled::\s*(\d{4}-\d{2}-\d{2})\]").unwrap());

/// Parse a clock time into minutes from midnight.
/// Accepts 24-hour times and 12-hour times with an am/pm suffix.
pub fn parse_time(text: &str) -> Option<i64> {
    let caps = TIME.captures(text)?;
    let hours: i64 = caps[1].parse().ok()?;
    let minutes: i64 = caps[2].parse().ok()?;
    if minutes > 59 {
        return None;
    }
    match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
        None => {
            if hours > 23 {
                return None;
            }
            Some(hours * 60 + minutes)
        }
        Some(suffix) => {
            if !(1..=12).contains(&hours) {
                return None;
            }
            let base = match (suffix.as_str(), hours) {
                ("am", 12) => 0,
                ("am", h) => h,
                ("pm", 12) => 12,
                ("pm", h) => h + 12,
                _ => return None,
            };
            Some(base * 60 + minutes)
        }
    }
}

/// Parse a `start - end` range into minutes. An end at or before the start
/// wraps past midnight (`23:30 - 00:15` ends at minute 1455).
pub fn parse_time_range(text: &str) -> Option<(i64, i64)> {
    let caps = RANGE.captures(text)?;
    let start = parse_time(&caps[1])?;
    let mut end = parse_time(&caps[2])?;
    if end <= start {
        end += 24 * 60;
    }
    Some((start, end))
}

/// Times at the start of a list item's line: `(start, Some(end))` for a
/// range, `(start, None)` for a single leading time, `None` when the item
/// carries no leading time.
pub fn leading_time_range(line: &str) -> Option<(i64, Option<i64>)> {
    let caps = LEADING_TIMES.captures(line)?;
    let start = parse_time(&caps["start"])?;
    let end = match caps.name("end") {
        Some(end) => {
            let mut end = parse_time(end.as_str())?;
            if end <= start {
                end += 24 * 60;
            }
            Some(end)
        }
        None => None,
    };
    Some((start, end))
}

/// Zero-padded 24-hour `HH:MM`. Minutes beyond midnight wrap back to clock
/// time so cross-midnight range ends re-parse to the same value.
pub fn format_time(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `HH:MM - HH:MM`
pub fn format_time_range(start_minutes: i64, end_minutes: i64) -> String {
    format!(
        "{} - {}",
        format_time(start_minutes),
        format_time(end_minutes)
    )
}

/// Rewrite the leading time range of a list-item line to the given times,
/// inserting one after the list prefix if the line has none. Text that is
/// not a list item yet becomes one.
pub fn set_time_range_in_line(line: &str, start_minutes: i64, end_minutes: i64) -> String {
    let range = format_time_range(start_minutes, end_minutes);
    if let Some(caps) = LEADING_TIMES.captures(line) {
        let rest = &caps["rest"];
        if rest.is_empty() {
            format!("{}{}", &caps["prefix"], range)
        } else {
            format!("{}{} {}", &caps["prefix"], range, rest)
        }
    } else if let Some(m) = LIST_PREFIX.find(line) {
        format!("{}{} {}", m.as_str(), range, &line[m.end()..])
    } else {
        let text = line.trim();
        if text.is_empty() {
            format!("- {}", range)
        } else {
            format!("- {} {}", range, text)
        }
    }
}

/// Remove the leading time or time range from a list-item line
pub fn strip_time_range(line: &str) -> String {
    match LEADING_TIMES.captures(line) {
        Some(caps) => {
            let rest = &caps["rest"];
            if rest.is_empty() {
                caps["prefix"].trim_end().to_string()
            } else {
                format!("{}{}", &caps["prefix"], rest)
            }
        }
        None => line.to_string(),
    }
}

/// The day a block is pinned to by an in-text marker (`⏳ YYYY-MM-DD` or
/// `[scheduled:: YYYY-MM-DD]`), if any. Blocks with such a marker stay in
/// their file when dragged across days; only the marker date changes.
pub fn scheduled_day_in_text(text: &str) -> Option<NaiveDate> {
    let date = PENDING_MARKER
        .captures(text)
        .or_else(|| SCHEDULED_FIELD.captures(text))?;
    NaiveDate::parse_from_str(&date[1], "%Y-%m-%d").ok()
}

/// Rewrite the date inside existing scheduled-day markers. Text without a
/// marker is returned unchanged.
pub fn set_scheduled_day_in_text(text: &str, day: NaiveDate) -> String {
    let date = day.format("%Y-%m-%d").to_string();
    let text = PENDING_MARKER.replace_all(text, format!("⏳ {}", date).as_str());
    SCHEDULED_FIELD
        .replace_all(&text, format!("[scheduled:: {}]", date).as_str())
        .into_owned()
}
