use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Europe::London;
use chrono_tz::Tz;
use regex::Regex;

const LAST_UPDATED: &str = "Last updated: ";

static LAST_UPDATED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Last updated: )\d{2}-\d{2}-\d{4}\s\d{2}:\d{2}:\d{2}\s\(\w+\)").unwrap()
});

/// `DD-MM-YYYY HH:MM:SS (TZ)`
pub fn format_timestamp(now: DateTime<Tz>) -> String {
    now.format("%d-%m-%Y %H:%M:%S (%Z)").to_string()
}

/// Replace the first "Last updated" marker with `now`, or append one.
pub fn stamp_description(current: Option<&str>, now: DateTime<Tz>) -> String {
    let timestamp = format_timestamp(now);

    match current {
        None | Some("") => format!("{}{}", LAST_UPDATED, timestamp),
        Some(description) if LAST_UPDATED_MARKER.is_match(description) => LAST_UPDATED_MARKER
            .replace(description, format!("${{1}}{}", timestamp))
            .into_owned(),
        Some(description) => format!("{} {}{}", description, LAST_UPDATED, timestamp),
    }
}

/// [`stamp_description`] with the current time in London.
pub fn stamp_description_now(current: Option<&str>) -> String {
    stamp_description(current, Utc::now().with_timezone(&London))
}
