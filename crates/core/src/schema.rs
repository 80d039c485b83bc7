//! The fixed extraction schema handed to the collaborator.
//!
//! The schema is an instruction prompt plus exactly one worked example pairing
//! a sample report with its fully annotated output. The annotation class names
//! and the parameter attribute keys (`name`, `value`, `unit`,
//! `reference_range`, `category`) are part of the contract with the
//! collaborator.

use crate::annotation::{Annotation, AnnotationClass};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Instruction describing what to extract.
pub const EXTRACTION_PROMPT: &str = "\
Extract blood test parameters from the provided medical report.

For each parameter, extract:
1. Parameter name (e.g., \"Hemoglobin\", \"Glucose\", \"Cholesterol\")
2. Numerical value
3. Unit of measurement (e.g., \"g/dL\", \"mg/dL\", \"mmol/L\")
4. Reference range (e.g., \"12.0-15.5\", \"< 100\")
5. Category (HEMATOLOGY, BIOCHEMISTRY, LIPID_PROFILE, THYROID_FUNCTION, LIVER_FUNCTION, KIDNEY_FUNCTION, DIABETES, CARDIOVASCULAR, INFLAMMATION, OTHER)

Also extract patient information:
- Patient name
- Date of birth
- Gender

And test information:
- Test date
- Lab name
- Report number

Use exact text from the document. Do not infer or add information not present in the text.";

const EXAMPLE_TEXT: &str = "\
Patient: John Doe, DOB: 01/15/1980, Gender: Male
Test Date: 2024-01-15
Lab: LabCorp
Report #: BT-2024-001

Hemoglobin: 14.2 g/dL (Reference: 12.0-15.5)
Glucose: 95 mg/dL (Reference: 70-100)
Cholesterol: 180 mg/dL (Reference: < 200)";

/// A sample document and the annotations expected for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkedExample {
    pub text: String,
    pub extractions: Vec<Annotation>,
}

/// Instruction plus worked example, as sent to the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSchema {
    pub prompt: String,
    pub examples: Vec<WorkedExample>,
}

impl ExtractionSchema {
    /// The blood test schema used for every request.
    pub fn blood_test() -> Self {
        Self {
            prompt: EXTRACTION_PROMPT.to_string(),
            examples: vec![worked_example()],
        }
    }
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self::blood_test()
    }
}

fn parameter_attributes(
    name: &str,
    value: Value,
    unit: &str,
    reference_range: &str,
    category: &str,
) -> Map<String, Value> {
    let mut attributes = Map::new();
    attributes.insert("name".into(), json!(name));
    attributes.insert("value".into(), value);
    attributes.insert("unit".into(), json!(unit));
    attributes.insert("reference_range".into(), json!(reference_range));
    attributes.insert("category".into(), json!(category));
    attributes
}

/// The single worked example: six report-level annotations and three parameters.
pub fn worked_example() -> WorkedExample {
    WorkedExample {
        text: EXAMPLE_TEXT.to_string(),
        extractions: vec![
            Annotation::new(AnnotationClass::PatientName, "John Doe"),
            Annotation::new(AnnotationClass::DateOfBirth, "01/15/1980"),
            Annotation::new(AnnotationClass::Gender, "Male"),
            Annotation::new(AnnotationClass::TestDate, "2024-01-15"),
            Annotation::new(AnnotationClass::LabName, "LabCorp"),
            Annotation::new(AnnotationClass::ReportNumber, "BT-2024-001"),
            Annotation::parameter(
                "Hemoglobin: 14.2 g/dL (Reference: 12.0-15.5)",
                parameter_attributes("Hemoglobin", json!(14.2), "g/dL", "12.0-15.5", "HEMATOLOGY"),
            ),
            Annotation::parameter(
                "Glucose: 95 mg/dL (Reference: 70-100)",
                parameter_attributes("Glucose", json!(95), "mg/dL", "70-100", "DIABETES"),
            ),
            Annotation::parameter(
                "Cholesterol: 180 mg/dL (Reference: < 200)",
                parameter_attributes("Cholesterol", json!(180), "mg/dL", "< 200", "LIPID_PROFILE"),
            ),
        ],
    }
}
