//! Common utilities for invoice generation.
//!
//! Shared helpers for date formatting and download filenames.

use chrono::{Datelike, Local, NaiveDate};

/// Date format submitted by HTML `<input type="date">` fields.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Today's date in the server's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Long US format used for the date of issue (e.g., "October 18, 2026").
pub fn format_long_date(date: NaiveDate) -> String {
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} {}, {}", month, date.day(), date.year())
}

/// Short US format used in the line-item table (e.g., "10/18/2026").
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Build the download filename for a member, e.g. "invoice-Jane-Doe.pdf".
///
/// Whitespace runs become a single dash; characters that are not ASCII
/// alphanumerics, dashes or underscores are dropped so the name is safe in a
/// `Content-Disposition` header.
pub fn invoice_filename(member_name: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in member_name.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            result.push(ch);
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    let stem = result.trim_matches('-');
    if stem.is_empty() {
        return "invoice-member.pdf".to_string();
    }

    format!("invoice-{}.pdf", stem)
}
