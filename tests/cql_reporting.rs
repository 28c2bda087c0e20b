//! Integration tests for the CQL structural scanner

use cds_workbench::cql::{Complexity, CqlDefinitionKind, scan_cql};
use pretty_assertions::assert_eq;

#[test]
fn library_header_name_and_version() {
    let report = scan_cql("library Foo version '1.0.0'");
    let library = report.library.expect("library entry");
    assert_eq!(library.name, "Foo");
    assert_eq!(library.version.as_deref(), Some("1.0.0"));
}

#[test]
fn report_serializes_for_display() {
    let report = scan_cql(
        "library Screening version '2.0'\nusing FHIR version '4.0.1'\ncontext Patient\ndefine \"InDenominator\":\n  [Encounter] E where E.status = 'finished'\n",
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["library"]["name"], "Screening");
    assert_eq!(json["complexity"], "low");
    assert_eq!(json["resources"][0], "Encounter");
    assert_eq!(json["statistics"]["definition_count"], 1);
}

#[test]
fn incomplete_source_gets_suggestions_not_errors() {
    let report = scan_cql("define \"Orphan\":\n  true");
    assert!(report.library.is_none());
    assert!(report.usings.is_empty());
    assert_eq!(report.definitions.len(), 1);
    assert_eq!(report.definitions[0].kind, CqlDefinitionKind::Definition);
    // library, using, context, and resources are all flagged
    assert_eq!(report.suggestions.len(), 4);
}

#[test]
fn many_defines_raise_the_complexity_label() {
    let source: String = (0..7)
        .map(|i| format!("define \"D{i}\":\n  true\n"))
        .collect();
    assert_eq!(scan_cql(&source).complexity, Complexity::Medium);
}
