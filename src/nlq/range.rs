//! Numeric value/range extraction
//!
//! An ordered pattern list; the first matching pattern wins. "between X and
//! Y" is declared before the bare "X-Y" form so a spelled-out range is never
//! claimed by the hyphen pattern.

use crate::fhir::SearchOperator;
use once_cell::sync::Lazy;
use regex::Regex;

const NUMBER: &str = r"(\d+(?:\.\d+)?)";

static PATTERNS: Lazy<Vec<(Regex, RangeKind)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(&format!(r"\bbetween\s+{NUMBER}\s+and\s+{NUMBER}")).expect("valid pattern"),
            RangeKind::Between,
        ),
        (
            Regex::new(&format!(r"\b(?:greater than|more than|above|over)\s+{NUMBER}"))
                .expect("valid pattern"),
            RangeKind::Single(SearchOperator::Gt),
        ),
        (
            Regex::new(&format!(r"\b(?:less than|below|under)\s+{NUMBER}")).expect("valid pattern"),
            RangeKind::Single(SearchOperator::Lt),
        ),
        (
            Regex::new(&format!(r"\bat least\s+{NUMBER}")).expect("valid pattern"),
            RangeKind::Single(SearchOperator::Ge),
        ),
        (
            Regex::new(&format!(r"\bat most\s+{NUMBER}")).expect("valid pattern"),
            RangeKind::Single(SearchOperator::Le),
        ),
        (
            Regex::new(&format!(r"\b(?:equals?(?:\s+to)?|is)\s+{NUMBER}")).expect("valid pattern"),
            RangeKind::Single(SearchOperator::Eq),
        ),
        (
            Regex::new(&format!(r"\b{NUMBER}\s*-\s*{NUMBER}\b")).expect("valid pattern"),
            RangeKind::Between,
        ),
    ]
});

#[derive(Clone, Copy)]
enum RangeKind {
    Between,
    Single(SearchOperator),
}

/// Extracted value filter: one bound, or two for a range
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValueFilter {
    /// Operator/value pairs in `ge`-before-`le` order for ranges
    pub bounds: Vec<(SearchOperator, String)>,
    /// The input fragment that produced this filter
    pub matched_text: String,
}

/// Extract the first matching value expression from lower-cased input
pub(crate) fn extract(input: &str) -> Option<ValueFilter> {
    for (pattern, kind) in PATTERNS.iter() {
        if let Some(captures) = pattern.captures(input) {
            let bounds = match kind {
                RangeKind::Between => vec![
                    (SearchOperator::Ge, captures[1].to_string()),
                    (SearchOperator::Le, captures[2].to_string()),
                ],
                RangeKind::Single(op) => vec![(*op, captures[1].to_string())],
            };
            return Some(ValueFilter {
                bounds,
                matched_text: captures[0].to_string(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_range() {
        let filter = extract("glucose between 100 and 200").unwrap();
        assert_eq!(
            filter.bounds,
            vec![
                (SearchOperator::Ge, "100".to_string()),
                (SearchOperator::Le, "200".to_string()),
            ]
        );
        assert_eq!(filter.matched_text, "between 100 and 200");
    }

    #[test]
    fn test_single_bounds() {
        assert_eq!(
            extract("a1c greater than 7.5").unwrap().bounds,
            vec![(SearchOperator::Gt, "7.5".to_string())]
        );
        assert_eq!(
            extract("bmi under 30").unwrap().bounds,
            vec![(SearchOperator::Lt, "30".to_string())]
        );
        assert_eq!(
            extract("at least 90").unwrap().bounds,
            vec![(SearchOperator::Ge, "90".to_string())]
        );
        assert_eq!(
            extract("value equals 5").unwrap().bounds,
            vec![(SearchOperator::Eq, "5".to_string())]
        );
    }

    #[test]
    fn test_hyphen_range_is_last_resort() {
        let filter = extract("glucose 100-200").unwrap();
        assert_eq!(
            filter.bounds,
            vec![
                (SearchOperator::Ge, "100".to_string()),
                (SearchOperator::Le, "200".to_string()),
            ]
        );
    }

    #[test]
    fn test_spelled_out_range_beats_hyphen() {
        // both forms present; the ordered list picks "between" first
        let filter = extract("between 1 and 2 or 5-9").unwrap();
        assert_eq!(filter.matched_text, "between 1 and 2");
    }

    #[test]
    fn test_no_value_expression() {
        assert!(extract("patients with diabetes").is_none());
    }
}
