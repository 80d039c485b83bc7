//! Normalisation of collaborator annotations into an [`ExtractionResult`].
//!
//! One pass over the annotations, dispatching on class. Single-valued fields are
//! last-write-wins; parameters accumulate in emission order with no
//! de-duplication. Malformed parameter records are skipped (see
//! [`crate::SkipReason`]) rather than failing the whole extraction.

use crate::annotation::{Annotation, AnnotationClass};
use crate::constants::OVERALL_CONFIDENCE;
use crate::model::{BloodParameter, ExtractionResult, PatientInfo, TestInfo};

/// Group annotations into patient info, test info and typed parameters.
///
/// Annotations are consumed; none are retained in the result.
pub fn normalize(annotations: Vec<Annotation>) -> ExtractionResult {
    let mut patient_info = PatientInfo::default();
    let mut test_info = TestInfo::default();
    let mut parameters = Vec::new();

    for annotation in annotations {
        match annotation.class {
            AnnotationClass::PatientName => patient_info.name = Some(annotation.text),
            AnnotationClass::DateOfBirth => patient_info.date_of_birth = Some(annotation.text),
            AnnotationClass::Gender => patient_info.gender = Some(annotation.text),
            AnnotationClass::TestDate => test_info.test_date = Some(annotation.text),
            AnnotationClass::LabName => test_info.lab_name = Some(annotation.text),
            AnnotationClass::ReportNumber => test_info.report_number = Some(annotation.text),
            AnnotationClass::Parameter => {
                match BloodParameter::from_attributes(&annotation.attributes) {
                    Ok(parameter) => parameters.push(parameter),
                    Err(reason) => {
                        tracing::debug!(text = %annotation.text, %reason, "skipping parameter annotation");
                    }
                }
            }
            AnnotationClass::Unknown => {}
        }
    }

    ExtractionResult {
        patient_info,
        test_info,
        parameters,
        confidence: OVERALL_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterCategory;
    use serde_json::{json, Map, Value};

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn hemoglobin(reference_range: &str) -> Annotation {
        Annotation::parameter(
            "Hemoglobin: 14.2 g/dL",
            attrs(json!({
                "name": "Hemoglobin",
                "value": 14.2,
                "unit": "g/dL",
                "reference_range": reference_range,
                "category": "HEMATOLOGY"
            })),
        )
    }

    fn sample_annotations() -> Vec<Annotation> {
        vec![
            Annotation::new(AnnotationClass::PatientName, "John Doe"),
            Annotation::new(AnnotationClass::DateOfBirth, "01/15/1980"),
            Annotation::new(AnnotationClass::Gender, "Male"),
            Annotation::new(AnnotationClass::TestDate, "2024-01-15"),
            Annotation::new(AnnotationClass::LabName, "LabCorp"),
            Annotation::new(AnnotationClass::ReportNumber, "BT-2024-001"),
            hemoglobin("12.0-15.5"),
            Annotation::parameter(
                "Glucose: 95 mg/dL",
                attrs(json!({ "name": "Glucose", "value": 95, "reference_range": "70-100" })),
            ),
            Annotation::parameter(
                "Cholesterol: 210 mg/dL",
                attrs(json!({ "name": "Cholesterol", "value": 210, "reference_range": "< 200" })),
            ),
        ]
    }

    #[test]
    fn hemoglobin_in_range_is_normal() {
        let result = normalize(vec![hemoglobin("12.0-15.5")]);

        assert_eq!(result.parameters.len(), 1);
        let param = &result.parameters[0];
        assert_eq!(param.name(), "Hemoglobin");
        assert_eq!(param.value(), 14.2);
        assert_eq!(param.category(), ParameterCategory::Hematology);
        assert_eq!(param.confidence(), 0.8);
        assert!(!param.is_abnormal());
    }

    #[test]
    fn hemoglobin_below_range_is_abnormal() {
        let result = normalize(vec![hemoglobin("15.0-16.0")]);
        assert!(result.parameters[0].is_abnormal());
    }

    #[test]
    fn groups_patient_and_test_info() {
        let result = normalize(sample_annotations());

        assert_eq!(
            result.patient_info,
            PatientInfo {
                name: Some("John Doe".into()),
                date_of_birth: Some("01/15/1980".into()),
                gender: Some("Male".into()),
            }
        );
        assert_eq!(
            result.test_info,
            TestInfo {
                test_date: Some("2024-01-15".into()),
                lab_name: Some("LabCorp".into()),
                report_number: Some("BT-2024-001".into()),
            }
        );
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.abnormal_count(), 1);
    }

    #[test]
    fn parameters_keep_emission_order() {
        let result = normalize(sample_annotations());
        let names: Vec<&str> = result.parameters.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["Hemoglobin", "Glucose", "Cholesterol"]);
    }

    #[test]
    fn single_valued_classes_are_last_write_wins() {
        let result = normalize(vec![
            Annotation::new(AnnotationClass::PatientName, "Alice"),
            Annotation::new(AnnotationClass::PatientName, "Bob"),
        ]);
        assert_eq!(result.patient_info.name.as_deref(), Some("Bob"));
    }

    #[test]
    fn duplicate_parameters_are_not_merged() {
        let result = normalize(vec![hemoglobin("12.0-15.5"), hemoglobin("15.0-16.0")]);
        assert_eq!(result.parameters.len(), 2);
        assert!(!result.parameters[0].is_abnormal());
        assert!(result.parameters[1].is_abnormal());
    }

    #[test]
    fn malformed_parameter_is_dropped_without_failing() {
        let result = normalize(vec![
            hemoglobin("12.0-15.5"),
            Annotation::parameter(
                "Platelets: abc",
                attrs(json!({ "name": "Platelets", "value": "abc" })),
            ),
            Annotation::parameter("Orphan value", attrs(json!({ "value": 3 }))),
        ]);

        assert_eq!(result.parameters.len(), 1);
        assert_eq!(result.parameters[0].name(), "Hemoglobin");
    }

    #[test]
    fn unknown_classes_are_ignored() {
        let result = normalize(vec![Annotation::new(AnnotationClass::Unknown, "Dr. Who")]);
        assert_eq!(result.patient_info, PatientInfo::default());
        assert_eq!(result.test_info, TestInfo::default());
        assert!(result.parameters.is_empty());
    }

    #[test]
    fn normalising_twice_gives_identical_results() {
        assert_eq!(normalize(sample_annotations()), normalize(sample_annotations()));
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = normalize(Vec::new());
        assert!(result.parameters.is_empty());
        assert_eq!(result.confidence, 0.8);
    }
}
