//! Date helper functions

use chrono::NaiveDateTime;

/// Format a date using a Moment.js-style format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2021-06-28"
/// format_date(&date, "LL")         // -> "June 28, 2021"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    if format == "LL" {
        return full_date(date);
    }
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date as an RFC 3339 UTC timestamp for feeds and `<time>`
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.and_utc().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Format date in full format (like "June 28, 2021")
pub fn full_date(date: &NaiveDateTime) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each family
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
