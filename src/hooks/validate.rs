//! Hook validation
//!
//! One pure function owns every presence and format check the editor needs;
//! the per-screen, per-service, and per-context copies of these checks in a
//! typical frontend collapse into this single diagnostics pass. Validation
//! never fails; callers decide what to do with the list.

use super::model::{HookDefinition, HookType, Indicator};
use super::transform::{is_known_condition_type, is_known_operator};
use crate::diagnostics::{Diagnostic, Diagnostics};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum card summary length, per the CDS Hooks card spec
pub const MAX_SUMMARY_LENGTH: usize = 140;

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("id pattern is valid"));

/// Validate an editor hook record, returning all diagnostics at once
pub fn validate_hook(hook: &HookDefinition) -> Diagnostics {
    let mut diags = Diagnostics::new();

    if hook.id.trim().is_empty() {
        diags.push(Diagnostic::error("missing-id", "hook id is required").with_field("id"));
    } else if !ID_PATTERN.is_match(&hook.id) {
        diags.push(
            Diagnostic::error(
                "invalid-id",
                "hook id must contain only lowercase letters, digits, and hyphens",
            )
            .with_field("id"),
        );
    }

    if hook.title.trim().is_empty() {
        diags.push(Diagnostic::error("missing-title", "hook title is required").with_field("title"));
    }

    if hook.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
        diags.push(
            Diagnostic::warning("missing-description", "a description helps reviewers")
                .with_field("description"),
        );
    }

    if !HookType::is_valid(&hook.hook) {
        diags.push(
            Diagnostic::error(
                "invalid-hook-type",
                format!(
                    "unknown hook type '{}'; expected one of: {}",
                    hook.hook,
                    HookType::ALL
                        .iter()
                        .map(|h| h.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
            .with_field("hook"),
        );
    }

    if hook.cards.is_empty() {
        diags.push(
            Diagnostic::warning("no-cards", "hook produces no cards and will be invisible")
                .with_field("cards"),
        );
    }
    for (index, card) in hook.cards.iter().enumerate() {
        let field = |name: &str| format!("cards[{index}].{name}");
        if card.summary.trim().is_empty() {
            diags.push(
                Diagnostic::error("missing-summary", "card summary is required")
                    .with_field(field("summary")),
            );
        } else if card.summary.chars().count() > MAX_SUMMARY_LENGTH {
            diags.push(
                Diagnostic::error(
                    "summary-too-long",
                    format!("card summary exceeds {MAX_SUMMARY_LENGTH} characters"),
                )
                .with_field(field("summary")),
            );
        }
        if !Indicator::is_valid(&card.indicator) {
            diags.push(
                Diagnostic::error(
                    "invalid-indicator",
                    format!("unknown indicator '{}'; expected info, warning, or critical", card.indicator),
                )
                .with_field(field("indicator")),
            );
        }
        for (link_index, link) in card.links.iter().enumerate() {
            if link.url.trim().is_empty() {
                diags.push(
                    Diagnostic::error("missing-link-url", "card link needs a url")
                        .with_field(format!("cards[{index}].links[{link_index}].url")),
                );
            }
        }
    }

    for (index, condition) in hook.conditions.iter().enumerate() {
        let field = |name: &str| format!("conditions[{index}].{name}");
        if condition.value.trim().is_empty() {
            diags.push(
                Diagnostic::error("missing-condition-value", "condition value is required")
                    .with_field(field("value")),
            );
        }
        if !is_known_condition_type(&condition.condition_type) {
            diags.push(
                Diagnostic::warning(
                    "unknown-condition-type",
                    format!(
                        "condition type '{}' is not in the mapping table and will pass through unchanged",
                        condition.condition_type
                    ),
                )
                .with_field(field("type")),
            );
        }
        if !is_known_operator(&condition.operator) {
            diags.push(
                Diagnostic::warning(
                    "unknown-operator",
                    format!(
                        "operator '{}' is not in the mapping table and will pass through unchanged",
                        condition.operator
                    ),
                )
                .with_field(field("operator")),
            );
        }
    }

    for (key, template) in &hook.prefetch {
        if !template.contains("{{") {
            diags.push(
                Diagnostic::warning(
                    "static-prefetch",
                    format!("prefetch '{key}' has no {{{{context.*}}}} token and will never vary"),
                )
                .with_field(format!("prefetch.{key}")),
            );
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::model::{Card, HookCondition, HookMetadata};
    use indexmap::IndexMap;

    fn valid_hook() -> HookDefinition {
        HookDefinition {
            id: "a1c-reminder".to_string(),
            title: "A1c reminder".to_string(),
            description: Some("Remind about overdue A1c".to_string()),
            hook: "patient-view".to_string(),
            conditions: vec![HookCondition {
                condition_type: "condition".to_string(),
                operator: "=".to_string(),
                value: "44054006".to_string(),
            }],
            cards: vec![Card::new("A1c overdue")],
            prefetch: IndexMap::from([(
                "patient".to_string(),
                "Patient/{{context.patientId}}".to_string(),
            )]),
            metadata: HookMetadata::default(),
        }
    }

    #[test]
    fn test_valid_hook_is_clean() {
        let diags = validate_hook(&valid_hook());
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    }

    #[test]
    fn test_id_charset() {
        let mut hook = valid_hook();
        hook.id = "A1c Reminder!".to_string();
        let diags = validate_hook(&hook);
        assert!(diags.errors().any(|d| d.code == "invalid-id"));
    }

    #[test]
    fn test_summary_length_limit() {
        let mut hook = valid_hook();
        hook.cards[0].summary = "x".repeat(141);
        let diags = validate_hook(&hook);
        assert!(diags.errors().any(|d| d.code == "summary-too-long"));

        hook.cards[0].summary = "x".repeat(140);
        assert!(validate_hook(&hook).is_empty());
    }

    #[test]
    fn test_unknown_hook_type_and_indicator() {
        let mut hook = valid_hook();
        hook.hook = "patient-admit".to_string();
        hook.cards[0].indicator = "severe".to_string();
        let diags = validate_hook(&hook);
        assert!(diags.errors().any(|d| d.code == "invalid-hook-type"));
        assert!(diags.errors().any(|d| d.code == "invalid-indicator"));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let mut hook = valid_hook();
        hook.description = None;
        hook.cards.clear();
        let diags = validate_hook(&hook);
        assert!(!diags.has_errors());
        assert!(diags.warnings().count() >= 2);
    }

    #[test]
    fn test_static_prefetch_warns() {
        let mut hook = valid_hook();
        hook.prefetch
            .insert("all".to_string(), "Patient".to_string());
        let diags = validate_hook(&hook);
        assert!(diags.warnings().any(|d| d.code == "static-prefetch"));
    }
}
