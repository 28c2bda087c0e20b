//! Frontend/backend record transformation
//!
//! Bidirectional mapping between the editor [`HookDefinition`] and the
//! backend [`ServiceConfig`]. Condition types and operators run through
//! fixed lookup tables; anything the tables do not know passes through
//! unchanged so an unrecognized value survives a round trip instead of being
//! dropped.

use super::model::{
    Card, HookCondition, HookDefinition, HookMetadata, ServiceConfig, ShowCardAction,
    TriggerCondition,
};

/// (frontend, backend) condition-type pairs
const CONDITION_TYPES: &[(&str, &str)] = &[
    ("age", "patient-age"),
    ("gender", "patient-gender"),
    ("condition", "diagnosis-code"),
    ("medication", "active-medication"),
    ("lab-result", "observation-value"),
    ("allergy", "allergy-code"),
];

/// (frontend symbol, backend code) operator pairs
const OPERATORS: &[(&str, &str)] = &[
    (">", "gt"),
    ("<", "lt"),
    (">=", "ge"),
    ("<=", "le"),
    ("=", "eq"),
    ("!=", "ne"),
];

fn lookup_forward(table: &[(&str, &str)], value: &str) -> String {
    table
        .iter()
        .find(|(frontend, _)| *frontend == value)
        .map(|(_, backend)| backend.to_string())
        .unwrap_or_else(|| value.to_string())
}

fn lookup_reverse(table: &[(&str, &str)], value: &str) -> String {
    table
        .iter()
        .find(|(_, backend)| *backend == value)
        .map(|(frontend, _)| frontend.to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Whether a frontend condition type is covered by the lookup table
pub fn is_known_condition_type(condition_type: &str) -> bool {
    CONDITION_TYPES.iter().any(|(f, _)| *f == condition_type)
}

/// Whether a frontend operator symbol is covered by the lookup table
pub fn is_known_operator(operator: &str) -> bool {
    OPERATORS.iter().any(|(f, _)| *f == operator)
}

/// Map an editor hook to the backend service-configuration shape
pub fn to_service_config(hook: &HookDefinition) -> ServiceConfig {
    ServiceConfig {
        service_id: hook.id.clone(),
        hook: hook.hook.clone(),
        title: hook.title.clone(),
        description: hook.description.clone(),
        enabled: true,
        trigger_conditions: hook
            .conditions
            .iter()
            .map(|c| TriggerCondition {
                condition_type: lookup_forward(CONDITION_TYPES, &c.condition_type),
                operator: lookup_forward(OPERATORS, &c.operator),
                value: c.value.clone(),
            })
            .collect(),
        actions: hook
            .cards
            .iter()
            .map(|card| ShowCardAction::new(normalize_card(card)))
            .collect(),
        prefetch: hook.prefetch.clone(),
    }
}

/// Map a backend service configuration back to the editor shape
pub fn from_service_config(config: &ServiceConfig) -> HookDefinition {
    HookDefinition {
        id: config.service_id.clone(),
        title: config.title.clone(),
        description: config.description.clone(),
        hook: config.hook.clone(),
        conditions: config
            .trigger_conditions
            .iter()
            .map(|c| HookCondition {
                condition_type: lookup_reverse(CONDITION_TYPES, &c.condition_type),
                operator: lookup_reverse(OPERATORS, &c.operator),
                value: c.value.clone(),
            })
            .collect(),
        cards: config
            .actions
            .iter()
            .map(|action| normalize_card(&action.card))
            .collect(),
        prefetch: config.prefetch.clone(),
        metadata: HookMetadata::default(),
    }
}

/// Apply the defaulting rules for optional card fields
fn normalize_card(card: &Card) -> Card {
    let mut normalized = card.clone();
    if normalized.indicator.is_empty() {
        normalized.indicator = "info".to_string();
    }
    normalized
}
