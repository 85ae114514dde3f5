//! Classifies relative "date posted" labels such as `"3 mins ago"`.

use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;

/// Listings older than this many days are not worth extracting.
pub const RECENCY_WINDOW_DAYS: i64 = 3;

lazy_static! {
    static ref MINUTES_AGO: Regex = Regex::new(r"(?i)^(\d+)\s*mins?\s*ago").unwrap();
    static ref HOURS_AGO: Regex = Regex::new(r"(?i)^(\d+)\s*hours?\s*ago").unwrap();
    static ref DAYS_AGO: Regex = Regex::new(r"(?i)^(\d+)\s*days?\s*ago").unwrap();
}

/// Returns true when `text` describes a moment within the recency window.
///
/// Unrecognised labels are treated as stale.
pub fn is_recent(text: &str) -> bool {
    let text = text.trim();
    if text.eq_ignore_ascii_case("just now") {
        return true;
    }

    // First matching unit wins: minutes, then hours, then days.
    let units: [(&Regex, fn(i64) -> Option<Duration>); 3] = [
        (&*MINUTES_AGO, Duration::try_minutes),
        (&*HOURS_AGO, Duration::try_hours),
        (&*DAYS_AGO, Duration::try_days),
    ];

    for (pattern, to_duration) in units {
        if let Some(captures) = pattern.captures(text) {
            return captures[1]
                .parse::<i64>()
                .ok()
                .and_then(to_duration)
                .map(within_window)
                .unwrap_or(false);
        }
    }

    false
}

fn within_window(age: Duration) -> bool {
    let now = Utc::now();
    let window = Duration::days(RECENCY_WINDOW_DAYS);
    match (now.checked_sub_signed(age), now.checked_sub_signed(window)) {
        (Some(posted), Some(cutoff)) => posted >= cutoff,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_now_is_recent_in_any_case() {
        assert!(is_recent("Just now"));
        assert!(is_recent("JUST NOW"));
        assert!(is_recent("  just now "));
    }

    #[test]
    fn day_labels_respect_the_three_day_window() {
        assert!(is_recent("1 day ago"));
        assert!(is_recent("3 days ago"));
        assert!(!is_recent("4 days ago"));
        assert!(!is_recent("30 days ago"));
    }

    #[test]
    fn minute_and_hour_labels() {
        assert!(is_recent("3 mins ago"));
        assert!(is_recent("1 min ago"));
        assert!(is_recent("8 hours ago"));
        assert!(is_recent("72 hours ago"));
        assert!(!is_recent("73 hours ago"));
        assert!(!is_recent("5000 mins ago"));
    }

    #[test]
    fn matching_ignores_case_and_spacing() {
        assert!(is_recent("2 DAYS AGO"));
        assert!(is_recent("5mins ago"));
        assert!(is_recent("1 Hour Ago"));
    }

    #[test]
    fn unrecognised_labels_are_stale() {
        assert!(!is_recent("gibberish"));
        assert!(!is_recent(""));
        assert!(!is_recent("2 weeks ago"));
        assert!(!is_recent("posted 2 days ago"));
        assert!(!is_recent("99999999999999999999 days ago"));
    }
}
