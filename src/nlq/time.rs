//! Time-expression extraction
//!
//! An ordered pattern list; the first matching pattern wins and the rest are
//! ignored. Patterns are ordered most-specific-first so "last 7 days" is
//! never claimed by the bare "recent" fallback. Months and years are
//! approximated as 30 and 365 days, matching search-prefix semantics rather
//! than calendar arithmetic.

use crate::fhir::SearchOperator;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:last|past)\s+(\d{1,4})\s+(day|week|month|year)s?")
        .expect("relative time pattern is valid")
});

/// Extracted time filter, anchored to an explicit `now`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimeFilter {
    /// Prefix operator for the date parameter
    pub operator: SearchOperator,
    /// Cut-off instant
    pub timestamp: DateTime<Utc>,
    /// The input fragment that produced this filter
    pub matched_text: String,
}

impl TimeFilter {
    /// Value rendered as a FHIR date
    pub fn value(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Extract the first matching time expression from lower-cased input
pub(crate) fn extract(input: &str, now: DateTime<Utc>) -> Option<TimeFilter> {
    if let Some(captures) = RELATIVE.captures(input) {
        let count: i64 = captures[1].parse().ok()?;
        let days = match &captures[2] {
            "day" => count,
            "week" => count * 7,
            "month" => count * 30,
            _ => count * 365,
        };
        return Some(TimeFilter {
            operator: SearchOperator::Ge,
            timestamp: now - Duration::days(days),
            matched_text: captures[0].to_string(),
        });
    }
    if input.contains("recent") {
        return Some(TimeFilter {
            operator: SearchOperator::Ge,
            timestamp: now - Duration::days(90),
            matched_text: "recent".to_string(),
        });
    }
    if input.contains("yesterday") {
        return Some(TimeFilter {
            operator: SearchOperator::Ge,
            timestamp: midnight(now - Duration::days(1)),
            matched_text: "yesterday".to_string(),
        });
    }
    if input.contains("today") {
        return Some(TimeFilter {
            operator: SearchOperator::Ge,
            timestamp: midnight(now),
            matched_text: "today".to_string(),
        });
    }
    None
}

fn midnight(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}
