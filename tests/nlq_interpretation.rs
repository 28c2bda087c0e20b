//! Integration tests for the natural-language query interpreter

use cds_workbench::fhir::{ResourceType, SearchOperator};
use cds_workbench::nlq::QueryInterpreter;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap()
}

#[test]
fn find_patients_with_diabetes_uses_documented_precedence() {
    // "patient" (Patient intent) and "with" (Condition intent) each score 1;
    // the documented tie-break picks the first-declared intent, Patient. The
    // diabetes term is still emitted as a coded parameter.
    let result = QueryInterpreter::new().interpret_at("find patients with diabetes", fixed_now());

    assert_eq!(result.resource_type, Some(ResourceType::Patient));
    let coded: Vec<_> = result.query.params.iter().filter(|p| p.is_coded()).collect();
    assert_eq!(coded.len(), 1);
    assert_eq!(coded[0].name, "code");
    assert_eq!(coded[0].value, "http://snomed.info/sct|44054006");
    assert_eq!(coded[0].display.as_deref(), Some("Diabetes mellitus type 2"));
}

#[test]
fn last_seven_days_is_exactly_seven_days_before_now() {
    let now = fixed_now();
    let result = QueryInterpreter::new().interpret_at("observations from the last 7 days", now);

    let date_param = result
        .query
        .params
        .iter()
        .find(|p| p.name == "date")
        .expect("date parameter");
    assert_eq!(date_param.operator, Some(SearchOperator::Ge));
    let expected = now - chrono::Duration::milliseconds(7 * 86_400_000);
    assert_eq!(date_param.value, expected.format("%Y-%m-%d").to_string());
}

#[test]
fn between_yields_ge_and_le_bounds() {
    let result = QueryInterpreter::new()
        .interpret_at("glucose results between 100 and 200", fixed_now());

    let bounds: Vec<_> = result
        .query
        .params
        .iter()
        .filter(|p| p.name == "value-quantity")
        .map(|p| (p.operator, p.value.as_str()))
        .collect();
    assert_eq!(
        bounds,
        vec![
            (Some(SearchOperator::Ge), "100"),
            (Some(SearchOperator::Le), "200"),
        ]
    );
}

#[rstest]
#[case("recent lab results", ResourceType::Observation)]
#[case("medications prescribed for Amy", ResourceType::MedicationRequest)]
#[case("hospital visits last 2 weeks", ResourceType::Encounter)]
#[case("known allergies", ResourceType::AllergyIntolerance)]
#[case("scheduled surgeries", ResourceType::Procedure)]
fn intent_classification(#[case] input: &str, #[case] expected: ResourceType) {
    let result = QueryInterpreter::new().interpret_at(input, fixed_now());
    assert_eq!(result.resource_type, Some(expected), "input: {input}");
}

#[test]
fn non_patient_queries_include_the_patient() {
    let result = QueryInterpreter::new().interpret_at("conditions diagnosed recently", fixed_now());
    assert_eq!(result.resource_type, Some(ResourceType::Condition));
    assert_eq!(result.query.includes, vec!["Condition:patient".to_string()]);
}

#[test]
fn interpretation_never_fails() {
    for input in ["", "   ", "!!!", "the quick brown fox", "採血結果"] {
        let result = QueryInterpreter::new().interpret_at(input, fixed_now());
        assert!((0.1..=1.0).contains(&result.confidence), "input: {input:?}");
    }
}

#[test]
fn query_string_is_well_formed() {
    let result = QueryInterpreter::new()
        .interpret_at("recent glucose labs for John Smith", fixed_now());
    let rendered = result.query.to_query_string();
    assert!(rendered.starts_with("/Observation?"));
    assert!(rendered.contains("_include=Observation%3Apatient"));
}
