//! CQL structural scanner
//!
//! A line-oriented scan of Clinical Quality Language source that extracts
//! declarations without parsing CQL expression syntax: the library header,
//! `using`/`include` statements, value sets, parameters, `define` blocks
//! (name plus a greedily collected body running to the next `define`), the
//! evaluation context, and FHIR resource retrieves. Malformed input never
//! errors; it yields an incomplete report plus suggestions naming the
//! missing sections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static LIBRARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^library\s+(?:"([^"]+)"|([A-Za-z_][\w.]*))(?:\s+version\s+'([^']*)')?"#)
        .expect("library pattern is valid")
});
static USING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^using\s+(\w+)(?:\s+version\s+'([^']*)')?").expect("using pattern is valid")
});
static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^include\s+([\w.]+)(?:\s+version\s+'([^']*)')?(?:\s+called\s+(\w+))?")
        .expect("include pattern is valid")
});
static VALUESET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^valueset\s+"([^"]+)"\s*:\s*'([^']*)'"#).expect("valueset pattern is valid")
});
static PARAMETER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^parameter\s+(?:"([^"]+)"|(\w+))(?:\s+(.+))?$"#)
        .expect("parameter pattern is valid")
});
static CONTEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^context\s+(\w+)").expect("context pattern is valid"));
static DEFINE_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^define\s+(?:fluent\s+)?function\s+(?:"([^"]+)"|(\w+))"#)
        .expect("define function pattern is valid")
});
static DEFINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^define\s+(?:"([^"]+)"|(\w+))"#).expect("define pattern is valid")
});
static RESOURCE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*([A-Z][A-Za-z]*)").expect("resource ref pattern is valid"));

/// FHIR resource names recognized inside retrieve brackets
const FHIR_RESOURCES: &[&str] = &[
    "Patient",
    "Condition",
    "Observation",
    "MedicationRequest",
    "MedicationStatement",
    "MedicationAdministration",
    "MedicationDispense",
    "Encounter",
    "Procedure",
    "AllergyIntolerance",
    "Immunization",
    "DiagnosticReport",
    "ServiceRequest",
    "CarePlan",
    "CareTeam",
    "Goal",
    "Claim",
    "Coverage",
    "Device",
    "DocumentReference",
    "Communication",
    "Task",
    "Specimen",
    "Location",
    "Organization",
    "Practitioner",
    "PractitionerRole",
    "RelatedPerson",
    "QuestionnaireResponse",
    "RiskAssessment",
];

/// Declared library header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlLibrary {
    /// Library name
    pub name: String,
    /// Declared version, when present
    pub version: Option<String>,
}

/// `using` statement (data model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlUsing {
    /// Model name (e.g. `FHIR`)
    pub model: String,
    /// Declared model version
    pub version: Option<String>,
}

/// `include` statement (imported library)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlInclude {
    /// Included library name
    pub name: String,
    /// Declared version
    pub version: Option<String>,
    /// Local alias from `called`
    pub alias: Option<String>,
}

/// `valueset` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlValueSet {
    /// Value set name
    pub name: String,
    /// Value set identifier (usually a canonical URL or OID)
    pub id: String,
}

/// `parameter` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlParameter {
    /// Parameter name
    pub name: String,
    /// Declared type, when present
    pub type_name: Option<String>,
    /// Default expression text, when present
    pub default_value: Option<String>,
}

/// Whether a `define` introduces a plain definition or a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CqlDefinitionKind {
    /// `define "Name": ...`
    Definition,
    /// `define function Name(...): ...`
    Function,
}

/// A named `define` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlDefinition {
    /// Definition name
    pub name: String,
    /// Definition or function
    pub kind: CqlDefinitionKind,
    /// Body text collected up to the next `define` (expression syntax is not
    /// parsed)
    pub body: String,
}

/// Coarse complexity label from declaration counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// At most 5 definitions and functions
    Low,
    /// At most 15 definitions and functions
    Medium,
    /// More than 15 definitions and functions
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Low => write!(f, "low"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::High => write!(f, "high"),
        }
    }
}

/// Section counts for the scanned source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CqlStatistics {
    /// Total source lines
    pub line_count: usize,
    /// Plain definitions
    pub definition_count: usize,
    /// Functions
    pub function_count: usize,
    /// Value sets
    pub value_set_count: usize,
    /// Parameters
    pub parameter_count: usize,
}

/// Structural report over one CQL source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlReport {
    /// Library header, when found
    pub library: Option<CqlLibrary>,
    /// Data models in use
    pub usings: Vec<CqlUsing>,
    /// Included libraries
    pub includes: Vec<CqlInclude>,
    /// Declared value sets
    pub value_sets: Vec<CqlValueSet>,
    /// Declared parameters
    pub parameters: Vec<CqlParameter>,
    /// Definitions and functions in source order
    pub definitions: Vec<CqlDefinition>,
    /// Evaluation context, when declared
    pub context: Option<String>,
    /// FHIR resource types retrieved, in first-seen order
    pub resources: Vec<String>,
    /// Coarse complexity label
    pub complexity: Complexity,
    /// Section counts
    pub statistics: CqlStatistics,
    /// Missing-section suggestions for incomplete sources
    pub suggestions: Vec<String>,
}

/// Scan CQL source into a structural report. Never fails; unrecognized or
/// malformed input yields an incomplete report with suggestions.
pub fn scan_cql(source: &str) -> CqlReport {
    let mut library = None;
    let mut usings = Vec::new();
    let mut includes = Vec::new();
    let mut value_sets = Vec::new();
    let mut parameters = Vec::new();
    let mut definitions: Vec<CqlDefinition> = Vec::new();
    let mut context = None;

    // (name, kind, body lines) of the define block being collected
    let mut current: Option<(String, CqlDefinitionKind, Vec<String>)> = None;

    for raw_line in source.lines() {
        let line = raw_line.trim();

        if let Some((name, kind, rest)) = match_define(line) {
            if let Some((prev_name, prev_kind, body)) = current.take() {
                definitions.push(close_definition(prev_name, prev_kind, body));
            }
            let mut body = Vec::new();
            if !rest.is_empty() {
                body.push(rest.to_string());
            }
            current = Some((name, kind, body));
            continue;
        }

        if let Some((_, _, body)) = current.as_mut() {
            // inside a define block everything up to the next define is body
            body.push(line.to_string());
            continue;
        }

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(captures) = LIBRARY_RE.captures(line) {
            if library.is_none() {
                library = Some(CqlLibrary {
                    name: quoted_or_bare(&captures, 1, 2),
                    version: captures.get(3).map(|m| m.as_str().to_string()),
                });
            }
        } else if let Some(captures) = USING_RE.captures(line) {
            usings.push(CqlUsing {
                model: captures[1].to_string(),
                version: captures.get(2).map(|m| m.as_str().to_string()),
            });
        } else if let Some(captures) = INCLUDE_RE.captures(line) {
            includes.push(CqlInclude {
                name: captures[1].to_string(),
                version: captures.get(2).map(|m| m.as_str().to_string()),
                alias: captures.get(3).map(|m| m.as_str().to_string()),
            });
        } else if let Some(captures) = VALUESET_RE.captures(line) {
            value_sets.push(CqlValueSet {
                name: captures[1].to_string(),
                id: captures[2].to_string(),
            });
        } else if let Some(captures) = PARAMETER_RE.captures(line) {
            parameters.push(parse_parameter(&captures));
        } else if let Some(captures) = CONTEXT_RE.captures(line) {
            context = Some(captures[1].to_string());
        }
    }
    if let Some((name, kind, body)) = current.take() {
        definitions.push(close_definition(name, kind, body));
    }

    let mut resources: Vec<String> = Vec::new();
    for captures in RESOURCE_REF_RE.captures_iter(source) {
        let name = &captures[1];
        if FHIR_RESOURCES.contains(&name) && !resources.iter().any(|r| r == name) {
            resources.push(name.to_string());
        }
    }

    let definition_count = definitions
        .iter()
        .filter(|d| d.kind == CqlDefinitionKind::Definition)
        .count();
    let function_count = definitions.len() - definition_count;
    let statistics = CqlStatistics {
        line_count: source.lines().count(),
        definition_count,
        function_count,
        value_set_count: value_sets.len(),
        parameter_count: parameters.len(),
    };

    let complexity = match definitions.len() {
        0..=5 => Complexity::Low,
        6..=15 => Complexity::Medium,
        _ => Complexity::High,
    };

    let mut suggestions = Vec::new();
    if library.is_none() {
        suggestions.push("Add a library declaration, e.g. library MyMeasure version '1.0.0'".to_string());
    }
    if usings.is_empty() {
        suggestions.push("Add a data model, e.g. using FHIR version '4.0.1'".to_string());
    }
    if context.is_none() {
        suggestions.push("Add an evaluation context, e.g. context Patient".to_string());
    }
    if definitions.is_empty() {
        suggestions.push("No define statements found; add at least one definition".to_string());
    }
    if resources.is_empty() {
        suggestions.push("No FHIR resource retrieves found, e.g. [Observation: \"HbA1c\"]".to_string());
    }

    CqlReport {
        library,
        usings,
        includes,
        value_sets,
        parameters,
        definitions,
        context,
        resources,
        complexity,
        statistics,
        suggestions,
    }
}

/// Match a `define` line, returning the name, kind, and any body text left on
/// the same line after the colon.
fn match_define(line: &str) -> Option<(String, CqlDefinitionKind, &str)> {
    if let Some(captures) = DEFINE_FUNCTION_RE.captures(line) {
        let rest = line[captures.get(0).map(|m| m.end()).unwrap_or(0)..]
            .trim_start_matches(|c: char| c == ':' || c.is_whitespace() || c == '(')
            .trim();
        return Some((
            quoted_or_bare(&captures, 1, 2),
            CqlDefinitionKind::Function,
            rest,
        ));
    }
    if let Some(captures) = DEFINE_RE.captures(line) {
        let rest = line[captures.get(0).map(|m| m.end()).unwrap_or(0)..]
            .trim_start()
            .trim_start_matches(':')
            .trim();
        return Some((
            quoted_or_bare(&captures, 1, 2),
            CqlDefinitionKind::Definition,
            rest,
        ));
    }
    None
}

fn close_definition(name: String, kind: CqlDefinitionKind, body: Vec<String>) -> CqlDefinition {
    CqlDefinition {
        name,
        kind,
        body: body.join("\n").trim().to_string(),
    }
}

fn quoted_or_bare(captures: &regex::Captures<'_>, quoted: usize, bare: usize) -> String {
    captures
        .get(quoted)
        .or_else(|| captures.get(bare))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Split a parameter tail into type and default parts
fn parse_parameter(captures: &regex::Captures<'_>) -> CqlParameter {
    let name = quoted_or_bare(captures, 1, 2);
    let tail = captures.get(3).map(|m| m.as_str().trim()).unwrap_or("");
    if tail.is_empty() {
        return CqlParameter {
            name,
            type_name: None,
            default_value: None,
        };
    }
    match tail.split_once("default") {
        Some((type_part, default_part)) => {
            let type_part = type_part.trim();
            CqlParameter {
                name,
                type_name: (!type_part.is_empty()).then(|| type_part.to_string()),
                default_value: Some(default_part.trim().to_string()),
            }
        }
        None => CqlParameter {
            name,
            type_name: Some(tail.to_string()),
            default_value: None,
        },
    }
}
