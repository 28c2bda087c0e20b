//! Natural-language to FHIR search-query interpretation
//!
//! The interpreter runs a fixed pipeline over one input string: intent
//! classification, medical-term dictionary scan, patient-name extraction,
//! time-expression extraction, and value/range extraction, then assembles a
//! [`SearchQuery`] and scores its own confidence. It never fails; an input
//! nothing matches produces a low-confidence result carrying a disclaimer.

mod intent;
mod range;
mod terms;
mod time;

use crate::fhir::{ResourceType, SearchParam, SearchQuery};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Capitalized word or pair after "for", "of", or "named".
/// Runs against the original-case input; the rest of the pipeline sees the
/// lower-cased text.
static PATIENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\b(?i:for|of|named)\s+)([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)")
        .expect("patient name pattern is valid")
});

/// Confidence below which the result carries a disclaimer
const DISCLAIMER_THRESHOLD: f64 = 0.5;

/// Result of interpreting one natural-language input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedQuery {
    /// Best-guess resource type, `None` when no intent keyword matched
    pub resource_type: Option<ResourceType>,
    /// Assembled search query (defaults to `Patient` when no intent matched)
    pub query: SearchQuery,
    /// Confidence in [0.1, 1.0]
    pub confidence: f64,
    /// Input fragments the pipeline accounted for
    pub matched_terms: Vec<String>,
    /// User-facing caveat for low-confidence results
    pub disclaimer: Option<String>,
}

/// Stateless natural-language query interpreter
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryInterpreter;

impl QueryInterpreter {
    /// Create an interpreter
    pub fn new() -> Self {
        Self
    }

    /// Interpret an input anchored to the current time
    pub fn interpret(&self, input: &str) -> InterpretedQuery {
        self.interpret_at(input, Utc::now())
    }

    /// Interpret an input anchored to an explicit `now`.
    /// Relative time expressions ("last 7 days") are resolved against `now`,
    /// which keeps the pipeline deterministic under test.
    pub fn interpret_at(&self, input: &str, now: DateTime<Utc>) -> InterpretedQuery {
        let original = input.trim();
        let text = original.to_lowercase();

        let intent_match = intent::classify(&text);
        let resource_type = intent_match.resource_type;
        let effective = resource_type.unwrap_or(ResourceType::Patient);

        let mut params: Vec<SearchParam> = Vec::new();
        let mut matched: Vec<String> = intent_match
            .matched_keywords
            .iter()
            .map(|kw| kw.to_string())
            .collect();

        for term in terms::scan(&text) {
            params.push(
                SearchParam::new(
                    effective.code_param_name(),
                    format!("{}|{}", term.system, term.code),
                )
                .with_display(term.display),
            );
            matched.push(term.term.to_string());
        }

        if let Some(captures) = PATIENT_NAME.captures(original) {
            let name = captures[1].to_string();
            let param_name = match effective {
                ResourceType::Patient => "name",
                _ => "patient.name",
            };
            params.push(SearchParam::new(param_name, name.clone()));
            matched.push(name);
        }

        if let Some(filter) = time::extract(&text, now) {
            params.push(
                SearchParam::new(effective.date_param_name(), filter.value())
                    .with_operator(filter.operator),
            );
            matched.push(filter.matched_text);
        }

        if let Some(filter) = range::extract(&text) {
            matched.push(filter.matched_text);
            for (operator, value) in filter.bounds {
                params.push(SearchParam::new("value-quantity", value).with_operator(operator));
            }
        }

        let mut query = SearchQuery::new(effective);
        query.params = params;
        if let Some(include) = effective.patient_include() {
            query.includes.push(include);
        }

        let confidence = score_confidence(&text, resource_type, &query, &matched);
        let disclaimer = (confidence < DISCLAIMER_THRESHOLD).then(|| {
            "This query was interpreted with low confidence; review it before running."
                .to_string()
        });

        InterpretedQuery {
            resource_type,
            query,
            confidence,
            matched_terms: matched,
            disclaimer,
        }
    }
}

/// Additive confidence score, clamped to [0.1, 1.0]: credit for a resolved
/// resource type, for parameters, for at least one coded parameter, and for
/// includes; a penalty when less than a third of the input words were
/// accounted for by matches.
fn score_confidence(
    text: &str,
    resource_type: Option<ResourceType>,
    query: &SearchQuery,
    matched: &[String],
) -> f64 {
    let mut score: f64 = 0.2;
    if resource_type.is_some() {
        score += 0.2;
    }
    if !query.params.is_empty() {
        score += 0.2;
    }
    if query.params.iter().any(|p| p.is_coded()) {
        score += 0.2;
    }
    if !query.includes.is_empty() {
        score += 0.1;
    }

    let total_words = text.split_whitespace().count();
    if total_words > 0 {
        let accounted: usize = matched
            .iter()
            .map(|fragment| fragment.split_whitespace().count())
            .sum();
        if (accounted as f64) / (total_words as f64) < 1.0 / 3.0 {
            score -= 0.2;
        }
    }

    score.clamp(0.1, 1.0)
}
