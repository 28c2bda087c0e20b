//! Integration tests for hook transformation and validation

use cds_workbench::hooks::model::{HookDefinition, ServiceConfig};
use cds_workbench::hooks::transform::{from_service_config, to_service_config};
use cds_workbench::hooks::validate::validate_hook;
use cds_workbench::hooks::render_prefetch;
use pretty_assertions::assert_eq;

const EDITOR_HOOK: &str = r#"{
  "id": "senior-bp-check",
  "title": "Senior BP check",
  "description": "Flag elevated blood pressure for seniors",
  "hook": "patient-view",
  "conditions": [
    { "type": "age", "operator": ">=", "value": "65" }
  ],
  "cards": [
    {
      "summary": "Blood pressure above threshold",
      "detail": "Latest systolic reading exceeds 140 mmHg.",
      "indicator": "warning",
      "links": [
        { "label": "Hypertension guideline", "url": "https://example.org/htn" }
      ]
    }
  ],
  "prefetch": {
    "patient": "Patient/{{context.patientId}}",
    "bp": "Observation?patient={{context.patientId}}&code=85354-9"
  }
}"#;

#[test]
fn editor_json_round_trips_through_backend_shape() {
    let hook: HookDefinition = serde_json::from_str(EDITOR_HOOK).unwrap();
    let config = to_service_config(&hook);

    // backend shape renames and remaps
    assert_eq!(config.service_id, "senior-bp-check");
    assert_eq!(config.trigger_conditions[0].condition_type, "patient-age");
    assert_eq!(config.trigger_conditions[0].operator, "ge");
    assert_eq!(config.actions[0].action_type, "show-card");

    // and back, preserving the asserted semantics
    let round_tripped = from_service_config(&config);
    assert_eq!(round_tripped.cards[0].summary, hook.cards[0].summary);
    assert_eq!(round_tripped.cards[0].indicator, "warning");
    assert_eq!(round_tripped.conditions[0].operator, ">=");
    assert_eq!(round_tripped.prefetch, hook.prefetch);
}

#[test]
fn backend_json_with_missing_optionals_gets_defaults() {
    let raw = r#"{
      "serviceId": "minimal",
      "hook": "order-sign",
      "title": "Minimal",
      "actions": [
        { "type": "show-card", "card": { "summary": "Heads up" } }
      ]
    }"#;
    let config: ServiceConfig = serde_json::from_str(raw).unwrap();
    assert!(config.enabled);

    let hook = from_service_config(&config);
    assert_eq!(hook.cards[0].indicator, "info");
    assert!(hook.cards[0].suggestions.is_empty());
    assert!(hook.cards[0].links.is_empty());
}

#[test]
fn validation_reports_all_problems_at_once() {
    let raw = r#"{
      "id": "Bad Id",
      "title": "",
      "hook": "page-load",
      "cards": [
        { "summary": "", "indicator": "severe" }
      ]
    }"#;
    let hook: HookDefinition = serde_json::from_str(raw).unwrap();
    let diags = validate_hook(&hook);

    let codes: Vec<&str> = diags.errors().map(|d| d.code.as_str()).collect();
    assert!(codes.contains(&"invalid-id"));
    assert!(codes.contains(&"missing-title"));
    assert!(codes.contains(&"invalid-hook-type"));
    assert!(codes.contains(&"missing-summary"));
    assert!(codes.contains(&"invalid-indicator"));
}

#[test]
fn prefetch_templates_render_against_context() {
    let hook: HookDefinition = serde_json::from_str(EDITOR_HOOK).unwrap();
    let rendered = render_prefetch(
        &hook.prefetch,
        &serde_json::json!({"patientId": "pat-7", "userId": "drx"}),
    );
    assert_eq!(rendered["patient"], "Patient/pat-7");
    assert_eq!(rendered["bp"], "Observation?patient=pat-7&code=85354-9");
}
