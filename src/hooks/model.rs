//! CDS hook records
//!
//! Two shapes of the same rule: the editor-facing [`HookDefinition`] and the
//! backend [`ServiceConfig`] wire shape, plus the invocation request/response
//! pair. Vocabulary fields (`hook`, `indicator`) are carried as strings so
//! unknown values survive a round trip and are reported by validation rather
//! than rejected at deserialization time.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trigger points a hook can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookType {
    /// Chart opened for a patient
    #[serde(rename = "patient-view")]
    PatientView,
    /// Orders about to be signed
    #[serde(rename = "order-sign")]
    OrderSign,
    /// Order selected from a list
    #[serde(rename = "order-select")]
    OrderSelect,
    /// Medication being prescribed
    #[serde(rename = "medication-prescribe")]
    MedicationPrescribe,
    /// Encounter starting
    #[serde(rename = "encounter-start")]
    EncounterStart,
    /// Encounter being discharged
    #[serde(rename = "encounter-discharge")]
    EncounterDischarge,
}

impl HookType {
    /// All hook types, in declaration order
    pub const ALL: &'static [HookType] = &[
        HookType::PatientView,
        HookType::OrderSign,
        HookType::OrderSelect,
        HookType::MedicationPrescribe,
        HookType::EncounterStart,
        HookType::EncounterDischarge,
    ];

    /// Wire name of the hook type
    pub fn as_str(&self) -> &'static str {
        match self {
            HookType::PatientView => "patient-view",
            HookType::OrderSign => "order-sign",
            HookType::OrderSelect => "order-select",
            HookType::MedicationPrescribe => "medication-prescribe",
            HookType::EncounterStart => "encounter-start",
            HookType::EncounterDischarge => "encounter-discharge",
        }
    }

    /// Whether a string names a known hook type
    pub fn is_valid(value: &str) -> bool {
        HookType::ALL.iter().any(|h| h.as_str() == value)
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookType::ALL
            .iter()
            .copied()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| format!("unknown hook type: {s}"))
    }
}

/// Card urgency levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    /// Informational card
    Info,
    /// Needs attention
    Warning,
    /// Urgent
    Critical,
}

impl Indicator {
    /// All indicators, in increasing urgency
    pub const ALL: &'static [Indicator] =
        &[Indicator::Info, Indicator::Warning, Indicator::Critical];

    /// Wire name of the indicator
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Info => "info",
            Indicator::Warning => "warning",
            Indicator::Critical => "critical",
        }
    }

    /// Whether a string names a known indicator
    pub fn is_valid(value: &str) -> bool {
        Indicator::ALL.iter().any(|i| i.as_str() == value)
    }
}

fn default_indicator() -> String {
    Indicator::Info.as_str().to_string()
}

fn default_link_type() -> String {
    "absolute".to_string()
}

fn default_enabled() -> bool {
    true
}

/// A condition gating a hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookCondition {
    /// Editor-facing condition type (e.g. `age`, `condition`, `lab-result`)
    #[serde(rename = "type")]
    pub condition_type: String,
    /// Comparison operator, editor symbols (`>`, `<=`, `=`, ...)
    pub operator: String,
    /// Comparison value
    pub value: String,
}

/// A suggested action on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Button label
    pub label: String,
    /// Longer description, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An external link on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLink {
    /// Link label
    pub label: String,
    /// Link target
    pub url: String,
    /// `absolute` or `smart`
    #[serde(rename = "type", default = "default_link_type")]
    pub link_type: String,
}

/// Attribution shown on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSource {
    /// Source label
    pub label: String,
    /// Source link, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An alert card returned to the EHR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// One-line summary (at most 140 characters)
    pub summary: String,
    /// Optional detail text (markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Urgency; unknown values are reported by validation
    #[serde(default = "default_indicator")]
    pub indicator: String,
    /// Attribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CardSource>,
    /// Suggested actions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    /// External links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<CardLink>,
}

impl Card {
    /// Create an informational card with just a summary
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: None,
            indicator: default_indicator(),
            source: None,
            suggestions: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// Editor metadata attached to a hook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookMetadata {
    /// Authoring version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Editor-facing hook record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookDefinition {
    /// Service identifier (lowercase letters, digits, hyphens)
    pub id: String,
    /// Display title
    pub title: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Trigger point; unknown values are reported by validation
    pub hook: String,
    /// Gating conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<HookCondition>,
    /// Cards returned when the conditions hold
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Card>,
    /// Prefetch templates keyed by token name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub prefetch: IndexMap<String, String>,
    /// Editor metadata
    #[serde(default)]
    pub metadata: HookMetadata,
}

/// Backend condition shape (symbolic operators replaced by word codes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCondition {
    /// Backend condition type (e.g. `patient-age`, `diagnosis-code`)
    pub condition_type: String,
    /// Backend operator code (`gt`, `le`, `eq`, ...)
    pub operator: String,
    /// Comparison value
    pub value: String,
}

/// Backend "show card" action wrapping one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowCardAction {
    /// Always `show-card`
    #[serde(rename = "type")]
    pub action_type: String,
    /// Card to show
    pub card: Card,
}

impl ShowCardAction {
    /// Wrap a card
    pub fn new(card: Card) -> Self {
        Self {
            action_type: "show-card".to_string(),
            card,
        }
    }
}

/// Backend service-configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Service identifier
    pub service_id: String,
    /// Trigger point
    pub hook: String,
    /// Display title
    pub title: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the service is active
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Gating conditions, backend shape
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_conditions: Vec<TriggerCondition>,
    /// Actions, currently always show-card
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ShowCardAction>,
    /// Prefetch templates keyed by token name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub prefetch: IndexMap<String, String>,
}

/// CDS service invocation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdsRequest {
    /// Trigger point being fired
    pub hook: String,
    /// Unique id for this invocation
    pub hook_instance: String,
    /// Hook context (patientId, userId, ...)
    pub context: serde_json::Value,
    /// Resolved prefetch data keyed by token name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub prefetch: IndexMap<String, serde_json::Value>,
}

/// CDS service invocation response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CdsResponse {
    /// Cards returned by the service
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_type_vocabulary() {
        assert!(HookType::is_valid("patient-view"));
        assert!(!HookType::is_valid("patient_view"));
        assert_eq!("order-sign".parse::<HookType>().unwrap(), HookType::OrderSign);
    }

    #[test]
    fn test_card_defaults_on_deserialization() {
        let card: Card = serde_json::from_str(r#"{"summary": "BP high"}"#).unwrap();
        assert_eq!(card.indicator, "info");
        assert!(card.suggestions.is_empty());
        assert!(card.links.is_empty());
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let cfg = ServiceConfig {
            service_id: "bp-alert".to_string(),
            hook: "patient-view".to_string(),
            title: "BP alert".to_string(),
            description: None,
            enabled: true,
            trigger_conditions: vec![TriggerCondition {
                condition_type: "patient-age".to_string(),
                operator: "ge".to_string(),
                value: "65".to_string(),
            }],
            actions: vec![ShowCardAction::new(Card::new("BP high"))],
            prefetch: IndexMap::new(),
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert!(json.get("serviceId").is_some());
        assert!(json.get("triggerConditions").is_some());
        assert_eq!(json["triggerConditions"][0]["conditionType"], "patient-age");
        assert_eq!(json["actions"][0]["type"], "show-card");
    }

    #[test]
    fn test_request_uses_hook_instance_key() {
        let request = CdsRequest {
            hook: "patient-view".to_string(),
            hook_instance: "d1577c69".to_string(),
            context: serde_json::json!({"patientId": "123"}),
            prefetch: IndexMap::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["hookInstance"], "d1577c69");
    }
}
