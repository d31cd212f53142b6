//! # Notification Text Rendering
//!
//! Renders the good windows of every surf spot into the plain-text body of the
//! push notification:
//!
//! ```text
//! 13th Beach:
//! 1.4m this Saturday
//! 2.1m next Monday
//!
//! Sandy:
//! No clean surf conditions :(
//! ```
//!
//! "this"/"next" compares Monday-based calendar weeks against the run's
//! notion of today in the reference timezone.

use crate::evaluate::GoodWindow;
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt::Write;

/// Line shown for a spot without any good window
pub const NO_CONDITIONS: &str = "No clean surf conditions :(";

/// Line shown for a spot whose forecast could not be obtained
pub const UNAVAILABLE: &str = "Forecast unavailable";

/// What the survey found for one spot.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Windows(Vec<GoodWindow>),
    /// Fetch or evaluation failed; the reason is for the log only
    Unavailable(String),
}

/// Result for one spot, ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationReport {
    pub name: String,
    pub outcome: Outcome,
}

/// English ordinal suffix for a day of month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (10..=20).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Weekday and ordinal day, e.g. "Sunday 10th".
pub fn readable_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}",
        date.format("%A"),
        date.day(),
        ordinal_suffix(date.day())
    )
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// "this" when `date` falls in the same Monday-based week as `today`, else "next".
pub fn week_label(date: NaiveDate, today: NaiveDate) -> &'static str {
    if week_start(date) == week_start(today) {
        "this"
    } else {
        "next"
    }
}

/// Render one spot's section, newline terminated.
pub fn render_section(report: &LocationReport, today: NaiveDate) -> String {
    let mut section = format!("{}:\n", report.name);
    match &report.outcome {
        Outcome::Windows(windows) if windows.is_empty() => {
            section.push_str(NO_CONDITIONS);
            section.push('\n');
        }
        Outcome::Windows(windows) => {
            for window in windows {
                // writing to a String cannot fail
                let _ = writeln!(
                    section,
                    "{:.1}m {} {}",
                    window.swell_height,
                    week_label(window.date, today),
                    window.date.format("%A")
                );
            }
        }
        Outcome::Unavailable(_) => {
            section.push_str(UNAVAILABLE);
            section.push('\n');
        }
    }
    section
}

/// Join every section with a blank line and trim the trailing newlines.
pub fn compose(reports: &[LocationReport], today: NaiveDate) -> String {
    let mut message = String::new();
    for report in reports {
        message.push_str(&render_section(report, today));
        message.push('\n');
    }
    message.trim_end_matches('\n').to_string()
}
