//! FHIR search-query types
//!
//! Typed representation of the query the interpreter assembles: a resource
//! type, search parameters with optional prefix operators, and `_include`
//! directives, rendered into the REST search syntax
//! (`/Condition?code=...&onset-date=ge2026-08-21&_include=Condition:patient`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// FHIR resource types the workbench can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Patient demographics
    Patient,
    /// Diagnosis / problem-list entry
    Condition,
    /// Lab result or vital sign
    Observation,
    /// Medication order
    MedicationRequest,
    /// Visit or admission
    Encounter,
    /// Performed procedure
    Procedure,
    /// Allergy or intolerance record
    AllergyIntolerance,
}

impl ResourceType {
    /// All resource types, in declaration order
    pub const ALL: &'static [ResourceType] = &[
        ResourceType::Patient,
        ResourceType::Condition,
        ResourceType::Observation,
        ResourceType::MedicationRequest,
        ResourceType::Encounter,
        ResourceType::Procedure,
        ResourceType::AllergyIntolerance,
    ];

    /// Canonical FHIR name of the resource type
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Patient => "Patient",
            ResourceType::Condition => "Condition",
            ResourceType::Observation => "Observation",
            ResourceType::MedicationRequest => "MedicationRequest",
            ResourceType::Encounter => "Encounter",
            ResourceType::Procedure => "Procedure",
            ResourceType::AllergyIntolerance => "AllergyIntolerance",
        }
    }

    /// Search parameter used for coded (system|code) filters on this type
    pub fn code_param_name(&self) -> &'static str {
        match self {
            ResourceType::MedicationRequest => "medication",
            ResourceType::Encounter => "type",
            _ => "code",
        }
    }

    /// Search parameter used for date filters on this type
    pub fn date_param_name(&self) -> &'static str {
        match self {
            ResourceType::Patient => "birthdate",
            ResourceType::Condition => "onset-date",
            ResourceType::MedicationRequest => "authoredon",
            _ => "date",
        }
    }

    /// `_include` directive pulling the referenced patient into the result,
    /// for types other than `Patient` itself
    pub fn patient_include(&self) -> Option<String> {
        match self {
            ResourceType::Patient => None,
            other => Some(format!("{}:patient", other.as_str())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resource type: {s}"))
    }
}

/// Prefix operator for a search parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOperator {
    /// Equal (the FHIR default, rendered without a prefix)
    Eq,
    /// Not equal
    Ne,
    /// Greater than
    Gt,
    /// Less than
    Lt,
    /// Greater than or equal
    Ge,
    /// Less than or equal
    Le,
}

impl SearchOperator {
    /// FHIR value prefix for this operator
    pub fn as_prefix(&self) -> &'static str {
        match self {
            SearchOperator::Eq => "eq",
            SearchOperator::Ne => "ne",
            SearchOperator::Gt => "gt",
            SearchOperator::Lt => "lt",
            SearchOperator::Ge => "ge",
            SearchOperator::Le => "le",
        }
    }
}

impl fmt::Display for SearchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_prefix())
    }
}

/// A single search parameter extracted from user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParam {
    /// Parameter name (e.g. `code`, `onset-date`, `value-quantity`)
    pub name: String,
    /// Optional prefix operator; `None` and `Eq` both render the bare value
    pub operator: Option<SearchOperator>,
    /// Parameter value; coded values use the `system|code` form
    pub value: String,
    /// Human-readable label for the matched value, when known
    pub display: Option<String>,
}

impl SearchParam {
    /// Create a parameter with no operator
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: None,
            value: value.into(),
            display: None,
        }
    }

    /// Set the prefix operator
    pub fn with_operator(mut self, operator: SearchOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Set the display label
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Whether the value is a coded `system|code` pair
    pub fn is_coded(&self) -> bool {
        self.value.contains('|')
    }

    /// Value as it appears in the query string, prefix included.
    /// `eq` is the FHIR default and renders without a prefix.
    pub fn render_value(&self) -> String {
        match self.operator {
            Some(SearchOperator::Eq) | None => self.value.clone(),
            Some(op) => format!("{}{}", op.as_prefix(), self.value),
        }
    }
}

/// An assembled FHIR search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Resource type being searched
    pub resource_type: ResourceType,
    /// Search parameters in extraction order
    pub params: Vec<SearchParam>,
    /// `_include` directives
    pub includes: Vec<String>,
}

impl SearchQuery {
    /// Create an empty query for a resource type
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            params: Vec::new(),
            includes: Vec::new(),
        }
    }

    /// Render as a REST search path, percent-encoded
    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() && self.includes.is_empty() {
            return format!("/{}", self.resource_type);
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for param in &self.params {
            serializer.append_pair(&param.name, &param.render_value());
        }
        for include in &self.includes {
            serializer.append_pair("_include", include);
        }
        format!("/{}?{}", self.resource_type, serializer.finish())
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_round_trip() {
        for rt in ResourceType::ALL {
            assert_eq!(rt.as_str().parse::<ResourceType>().unwrap(), *rt);
        }
        assert!("Basic".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_render_value_prefixes() {
        let p = SearchParam::new("value-quantity", "100").with_operator(SearchOperator::Ge);
        assert_eq!(p.render_value(), "ge100");

        let eq = SearchParam::new("value-quantity", "7").with_operator(SearchOperator::Eq);
        assert_eq!(eq.render_value(), "7");
    }

    #[test]
    fn test_query_string_encoding() {
        let mut query = SearchQuery::new(ResourceType::Condition);
        query.params.push(SearchParam::new(
            "code",
            "http://snomed.info/sct|44054006",
        ));
        query.includes.push("Condition:patient".to_string());

        let rendered = query.to_query_string();
        assert!(rendered.starts_with("/Condition?code="));
        // the pipe must be percent-encoded
        assert!(rendered.contains("%7C44054006"));
        assert!(rendered.contains("_include=Condition%3Apatient"));
    }

    #[test]
    fn test_empty_query_has_no_question_mark() {
        assert_eq!(
            SearchQuery::new(ResourceType::Patient).to_query_string(),
            "/Patient"
        );
    }
}
