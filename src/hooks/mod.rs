//! CDS hook configuration: records, transformation, and validation

pub mod model;
pub mod transform;
pub mod validate;

use indexmap::IndexMap;
use self::model::{CdsRequest, HookDefinition};
use once_cell::sync::Lazy;
use regex::Regex;

static CONTEXT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{context\.([A-Za-z0-9_]+)\}\}").expect("context token pattern is valid")
});

/// Resolve `{{context.*}}` tokens in prefetch templates against a hook
/// context object. Tokens without a matching context field are left in place
/// so the caller can see what was missing.
pub fn render_prefetch(
    templates: &IndexMap<String, String>,
    context: &serde_json::Value,
) -> IndexMap<String, String> {
    templates
        .iter()
        .map(|(key, template)| {
            let rendered = CONTEXT_TOKEN.replace_all(template, |captures: &regex::Captures<'_>| {
                match context.get(&captures[1]).and_then(|v| v.as_str()) {
                    Some(value) => value.to_string(),
                    None => captures[0].to_string(),
                }
            });
            (key.clone(), rendered.into_owned())
        })
        .collect()
}

impl CdsRequest {
    /// Build an invocation request for a hook, rendering its prefetch
    /// templates against the given context. Rendered queries are passed as
    /// string values; the caller resolves them against FHIR before sending
    /// when the backend expects resolved bundles.
    pub fn for_hook(hook: &HookDefinition, hook_instance: impl Into<String>, context: serde_json::Value) -> Self {
        let prefetch = render_prefetch(&hook.prefetch, &context)
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect();
        Self {
            hook: hook.hook.clone(),
            hook_instance: hook_instance.into(),
            context,
            prefetch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_prefetch_substitutes_context() {
        let templates = IndexMap::from([
            ("patient".to_string(), "Patient/{{context.patientId}}".to_string()),
            ("conditions".to_string(), "Condition?patient={{context.patientId}}&clinical-status=active".to_string()),
        ]);
        let rendered = render_prefetch(&templates, &json!({"patientId": "pat-42"}));
        assert_eq!(rendered["patient"], "Patient/pat-42");
        assert_eq!(
            rendered["conditions"],
            "Condition?patient=pat-42&clinical-status=active"
        );
    }

    #[test]
    fn test_unresolved_tokens_are_kept() {
        let templates =
            IndexMap::from([("user".to_string(), "Practitioner/{{context.userId}}".to_string())]);
        let rendered = render_prefetch(&templates, &json!({"patientId": "pat-42"}));
        assert_eq!(rendered["user"], "Practitioner/{{context.userId}}");
    }
}
