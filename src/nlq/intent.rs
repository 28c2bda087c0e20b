//! Keyword-overlap intent classification
//!
//! Each intent carries a fixed keyword list. An intent's score is the number
//! of its keywords appearing as substrings of the lower-cased input. The
//! highest score wins; ties go to the first-declared intent. Declaration
//! order is therefore part of the contract and `INTENTS` is ordered from the
//! most generic (Patient) to the most specific resource types.

use crate::fhir::ResourceType;

/// A query intent: a target resource type plus its trigger vocabulary
pub(crate) struct Intent {
    pub resource_type: ResourceType,
    /// Keyword stems matched as substrings; stems cover plural forms
    pub keywords: &'static [&'static str],
}

/// Intent table, tie-break order is declaration order
pub(crate) const INTENTS: &[Intent] = &[
    Intent {
        resource_type: ResourceType::Patient,
        keywords: &["patient", "person", "people", "demographic", "born"],
    },
    Intent {
        resource_type: ResourceType::Condition,
        keywords: &[
            "condition",
            "diagnos",
            "problem",
            "suffering",
            "history of",
            "with",
        ],
    },
    Intent {
        resource_type: ResourceType::Observation,
        keywords: &[
            "observation",
            "lab",
            "result",
            "test",
            "level",
            "reading",
            "vital",
        ],
    },
    Intent {
        resource_type: ResourceType::MedicationRequest,
        keywords: &["medication", "prescription", "prescribed", "taking", "drug"],
    },
    Intent {
        resource_type: ResourceType::Encounter,
        keywords: &["encounter", "visit", "admission", "admitted", "appointment"],
    },
    Intent {
        resource_type: ResourceType::Procedure,
        keywords: &["procedure", "surger", "operation"],
    },
    Intent {
        resource_type: ResourceType::AllergyIntolerance,
        keywords: &["allerg", "intoleran", "reaction"],
    },
];

/// Outcome of classifying one input string
pub(crate) struct IntentMatch {
    /// Winning resource type, `None` when no keyword matched at all
    pub resource_type: Option<ResourceType>,
    /// The winner's keywords found in the input; the keyword hit count is the
    /// winner's score
    pub matched_keywords: Vec<&'static str>,
}

/// Classify a lower-cased input string against the intent table
pub(crate) fn classify(input: &str) -> IntentMatch {
    let mut best: Option<(&Intent, Vec<&'static str>)> = None;

    for intent in INTENTS {
        let matched: Vec<&'static str> = intent
            .keywords
            .iter()
            .copied()
            .filter(|kw| input.contains(kw))
            .collect();
        let beats_best = match &best {
            Some((_, prev)) => matched.len() > prev.len(),
            None => !matched.is_empty(),
        };
        if beats_best {
            best = Some((intent, matched));
        }
    }

    match best {
        Some((intent, matched)) => IntentMatch {
            resource_type: Some(intent.resource_type),
            matched_keywords: matched,
        },
        None => IntentMatch {
            resource_type: None,
            matched_keywords: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keyword_wins() {
        let m = classify("show recent lab results");
        assert_eq!(m.resource_type, Some(ResourceType::Observation));
        // "lab" and "result" both hit
        assert_eq!(m.matched_keywords.len(), 2);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        // "patient" (Patient) and "with" (Condition) both score 1;
        // Patient is declared first and wins the tie.
        let m = classify("find patients with diabetes");
        assert_eq!(m.resource_type, Some(ResourceType::Patient));
        assert_eq!(m.matched_keywords.len(), 1);
    }

    #[test]
    fn test_no_keywords_yields_none() {
        let m = classify("zzz qqq");
        assert_eq!(m.resource_type, None);
        assert_eq!(m.matched_keywords.len(), 0);
    }

    #[test]
    fn test_stems_cover_plurals() {
        assert_eq!(
            classify("upcoming surgeries").resource_type,
            Some(ResourceType::Procedure)
        );
        assert_eq!(
            classify("known allergies").resource_type,
            Some(ResourceType::AllergyIntolerance)
        );
    }
}
