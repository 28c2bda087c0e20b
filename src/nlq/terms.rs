//! Fixed medical-term dictionary
//!
//! Conditions, labs, medications, and vitals the interpreter recognizes,
//! each mapped to a coded concept. Terms are matched as substrings of the
//! lower-cased input; hits are deduplicated by code, first occurrence wins.

/// Category a dictionary term belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TermCategory {
    Condition,
    Lab,
    Medication,
    Vital,
}

/// One dictionary entry: free-text term plus its coded concept
pub(crate) struct MedicalTerm {
    pub term: &'static str,
    pub system: &'static str,
    pub code: &'static str,
    pub display: &'static str,
    pub category: TermCategory,
}

const SNOMED: &str = "http://snomed.info/sct";
const LOINC: &str = "http://loinc.org";
const RXNORM: &str = "http://www.nlm.nih.gov/research/umls/rxnorm";

/// The fixed vocabulary table
pub(crate) const TERMS: &[MedicalTerm] = &[
    // Conditions (SNOMED CT)
    MedicalTerm {
        term: "diabetes",
        system: SNOMED,
        code: "44054006",
        display: "Diabetes mellitus type 2",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "hypertension",
        system: SNOMED,
        code: "38341003",
        display: "Hypertensive disorder",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "asthma",
        system: SNOMED,
        code: "195967001",
        display: "Asthma",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "copd",
        system: SNOMED,
        code: "13645005",
        display: "Chronic obstructive pulmonary disease",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "pneumonia",
        system: SNOMED,
        code: "233604007",
        display: "Pneumonia",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "depression",
        system: SNOMED,
        code: "35489007",
        display: "Depressive disorder",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "heart failure",
        system: SNOMED,
        code: "84114007",
        display: "Heart failure",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "atrial fibrillation",
        system: SNOMED,
        code: "49436004",
        display: "Atrial fibrillation",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "anemia",
        system: SNOMED,
        code: "271737000",
        display: "Anemia",
        category: TermCategory::Condition,
    },
    MedicalTerm {
        term: "covid",
        system: SNOMED,
        code: "840539006",
        display: "COVID-19",
        category: TermCategory::Condition,
    },
    // Labs (LOINC)
    MedicalTerm {
        term: "a1c",
        system: LOINC,
        code: "4548-4",
        display: "Hemoglobin A1c",
        category: TermCategory::Lab,
    },
    MedicalTerm {
        term: "glucose",
        system: LOINC,
        code: "2339-0",
        display: "Glucose [Mass/volume] in Blood",
        category: TermCategory::Lab,
    },
    MedicalTerm {
        term: "cholesterol",
        system: LOINC,
        code: "2093-3",
        display: "Cholesterol [Mass/volume] in Serum or Plasma",
        category: TermCategory::Lab,
    },
    MedicalTerm {
        term: "creatinine",
        system: LOINC,
        code: "2160-0",
        display: "Creatinine [Mass/volume] in Serum or Plasma",
        category: TermCategory::Lab,
    },
    MedicalTerm {
        term: "potassium",
        system: LOINC,
        code: "2823-3",
        display: "Potassium [Moles/volume] in Serum or Plasma",
        category: TermCategory::Lab,
    },
    MedicalTerm {
        term: "sodium",
        system: LOINC,
        code: "2951-2",
        display: "Sodium [Moles/volume] in Serum or Plasma",
        category: TermCategory::Lab,
    },
    MedicalTerm {
        term: "tsh",
        system: LOINC,
        code: "3016-3",
        display: "Thyrotropin [Units/volume] in Serum or Plasma",
        category: TermCategory::Lab,
    },
    // Medications (RxNorm)
    MedicalTerm {
        term: "metformin",
        system: RXNORM,
        code: "6809",
        display: "Metformin",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "lisinopril",
        system: RXNORM,
        code: "29046",
        display: "Lisinopril",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "atorvastatin",
        system: RXNORM,
        code: "83367",
        display: "Atorvastatin",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "aspirin",
        system: RXNORM,
        code: "1191",
        display: "Aspirin",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "warfarin",
        system: RXNORM,
        code: "11289",
        display: "Warfarin",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "amoxicillin",
        system: RXNORM,
        code: "723",
        display: "Amoxicillin",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "ibuprofen",
        system: RXNORM,
        code: "5640",
        display: "Ibuprofen",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "omeprazole",
        system: RXNORM,
        code: "7646",
        display: "Omeprazole",
        category: TermCategory::Medication,
    },
    MedicalTerm {
        term: "albuterol",
        system: RXNORM,
        code: "435",
        display: "Albuterol",
        category: TermCategory::Medication,
    },
    // Vitals (LOINC)
    MedicalTerm {
        term: "blood pressure",
        system: LOINC,
        code: "85354-9",
        display: "Blood pressure panel",
        category: TermCategory::Vital,
    },
    MedicalTerm {
        term: "heart rate",
        system: LOINC,
        code: "8867-4",
        display: "Heart rate",
        category: TermCategory::Vital,
    },
    MedicalTerm {
        term: "temperature",
        system: LOINC,
        code: "8310-5",
        display: "Body temperature",
        category: TermCategory::Vital,
    },
    MedicalTerm {
        term: "weight",
        system: LOINC,
        code: "29463-7",
        display: "Body weight",
        category: TermCategory::Vital,
    },
    MedicalTerm {
        term: "bmi",
        system: LOINC,
        code: "39156-5",
        display: "Body mass index",
        category: TermCategory::Vital,
    },
    MedicalTerm {
        term: "oxygen saturation",
        system: LOINC,
        code: "59408-5",
        display: "Oxygen saturation in Arterial blood by Pulse oximetry",
        category: TermCategory::Vital,
    },
];

/// Scan a lower-cased input for dictionary terms, deduplicated by code
pub(crate) fn scan(input: &str) -> Vec<&'static MedicalTerm> {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut hits = Vec::new();
    for term in TERMS {
        if input.contains(term.term) && !seen.contains(&term.code) {
            seen.push(term.code);
            hits.push(term);
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_finds_condition_and_medication() {
        let hits = scan("diabetic patient on metformin with diabetes");
        let terms: Vec<&str> = hits.iter().map(|t| t.term).collect();
        assert_eq!(terms, vec!["diabetes", "metformin"]);
    }

    #[test]
    fn test_scan_deduplicates_by_code() {
        let hits = scan("diabetes and more diabetes");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "44054006");
    }

    #[test]
    fn test_multiword_terms_match() {
        let hits = scan("trend of blood pressure and heart rate");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|t| t.category == TermCategory::Vital));
    }

    #[test]
    fn test_unknown_text_matches_nothing() {
        assert!(scan("hello world").is_empty());
    }
}
