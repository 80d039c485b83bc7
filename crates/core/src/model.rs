//! Typed extraction records.
//!
//! These are the shapes returned to callers once the collaborator's annotations
//! have been normalised.

use crate::constants::DEFAULT_PARAMETER_CONFIDENCE;
use crate::range;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Clinical grouping of a blood parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterCategory {
    Hematology,
    Biochemistry,
    LipidProfile,
    ThyroidFunction,
    LiverFunction,
    KidneyFunction,
    Diabetes,
    Cardiovascular,
    Inflammation,
    #[default]
    Other,
}

impl ParameterCategory {
    /// Map a free-text category label onto a category.
    ///
    /// Matching ignores case and treats spaces and hyphens as underscores.
    /// Unknown labels fall back to [`ParameterCategory::Other`].
    pub fn from_label(label: &str) -> Self {
        let normalised: String = label
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match normalised.as_str() {
            "HEMATOLOGY" | "HAEMATOLOGY" => Self::Hematology,
            "BIOCHEMISTRY" => Self::Biochemistry,
            "LIPID_PROFILE" => Self::LipidProfile,
            "THYROID_FUNCTION" => Self::ThyroidFunction,
            "LIVER_FUNCTION" => Self::LiverFunction,
            "KIDNEY_FUNCTION" => Self::KidneyFunction,
            "DIABETES" => Self::Diabetes,
            "CARDIOVASCULAR" => Self::Cardiovascular,
            "INFLAMMATION" => Self::Inflammation,
            _ => Self::Other,
        }
    }
}

/// Why a `parameter` annotation was left out of a result.
///
/// Skips are a local recovery: they are logged and never reach the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("parameter has no name attribute")]
    MissingName,
    #[error("parameter name is not text")]
    NonTextName,
    #[error("parameter has no value attribute")]
    MissingValue,
    #[error("parameter value {0} is not a finite number")]
    UncoercibleValue(String),
}

/// A single measured lab value.
///
/// `is_abnormal` is computed once from `value` and `reference_range` when the
/// parameter is constructed. Fields are read-only so the flag cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct BloodParameter {
    name: String,
    value: f64,
    unit: Option<String>,
    reference_range: Option<String>,
    category: ParameterCategory,
    confidence: f64,
    is_abnormal: bool,
}

impl BloodParameter {
    /// Construct a parameter, deriving `is_abnormal` from the reference range.
    ///
    /// `confidence` is clamped into `[0, 1]`.
    pub fn new(
        name: impl Into<String>,
        value: f64,
        unit: Option<String>,
        reference_range: Option<String>,
        category: ParameterCategory,
        confidence: f64,
    ) -> Self {
        let is_abnormal = range::is_abnormal(value, reference_range.as_deref().unwrap_or(""));
        Self {
            name: name.into(),
            value,
            unit,
            reference_range,
            category,
            confidence: confidence.clamp(0.0, 1.0),
            is_abnormal,
        }
    }

    /// Build a parameter from the attribute map of a `parameter` annotation.
    ///
    /// Requires both `name` and `value`. `value` may be a JSON number or a
    /// string holding one. `category` defaults to `OTHER`, and `confidence`
    /// defaults to [`DEFAULT_PARAMETER_CONFIDENCE`] unless the collaborator
    /// supplied a number in `[0, 1]`.
    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self, SkipReason> {
        let name = match attributes.get("name") {
            None | Some(Value::Null) => return Err(SkipReason::MissingName),
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(SkipReason::NonTextName),
        };

        let value = match attributes.get("value") {
            None | Some(Value::Null) => return Err(SkipReason::MissingValue),
            Some(raw) => coerce_value(raw)
                .ok_or_else(|| SkipReason::UncoercibleValue(raw.to_string()))?,
        };

        let category = attributes
            .get("category")
            .and_then(Value::as_str)
            .map(ParameterCategory::from_label)
            .unwrap_or_default();

        let confidence = attributes
            .get("confidence")
            .and_then(Value::as_f64)
            .filter(|c| (0.0..=1.0).contains(c))
            .unwrap_or(DEFAULT_PARAMETER_CONFIDENCE);

        Ok(Self::new(
            name,
            value,
            text_attribute(attributes, "unit"),
            text_attribute(attributes, "reference_range"),
            category,
            confidence,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn reference_range(&self) -> Option<&str> {
        self.reference_range.as_deref()
    }

    pub fn category(&self) -> ParameterCategory {
        self.category
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn is_abnormal(&self) -> bool {
        self.is_abnormal
    }
}

fn coerce_value(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn text_attribute(attributes: &Map<String, Value>, key: &str) -> Option<String> {
    match attributes.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Patient details found in a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl PatientInfo {
    /// Fill any field this record lacks from `hint`. Existing values are kept.
    pub fn fill_missing_from(&mut self, hint: PatientInfo) {
        self.name = self.name.take().or(hint.name);
        self.date_of_birth = self.date_of_birth.take().or(hint.date_of_birth);
        self.gender = self.gender.take().or(hint.gender);
    }

    /// Build a hint from a free-form JSON object.
    ///
    /// Keys are accepted in camelCase or snake_case. Numbers are kept as their
    /// text. Anything else, including unknown keys, is ignored.
    pub fn from_hint(hint: &Map<String, Value>) -> Self {
        let field = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| text_attribute(hint, key).filter(|v| !v.trim().is_empty()))
        };
        Self {
            name: field(&["name"]),
            date_of_birth: field(&["dateOfBirth", "date_of_birth"]),
            gender: field(&["gender"]),
        }
    }
}

/// Details about the test itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_number: Option<String>,
}

/// The normalised outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ExtractionResult {
    pub patient_info: PatientInfo,
    pub test_info: TestInfo,
    pub parameters: Vec<BloodParameter>,
    pub confidence: f64,
}

impl ExtractionResult {
    /// Number of parameters flagged as outside their reference range.
    pub fn abnormal_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_abnormal()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn category_labels_are_matched_leniently() {
        assert_eq!(ParameterCategory::from_label("HEMATOLOGY"), ParameterCategory::Hematology);
        assert_eq!(ParameterCategory::from_label("lipid profile"), ParameterCategory::LipidProfile);
        assert_eq!(ParameterCategory::from_label("Kidney-Function"), ParameterCategory::KidneyFunction);
        assert_eq!(ParameterCategory::from_label("VITAMINS"), ParameterCategory::Other);
    }

    #[test]
    fn category_serialises_in_screaming_snake_case() {
        let json = serde_json::to_value(ParameterCategory::ThyroidFunction).unwrap();
        assert_eq!(json, json!("THYROID_FUNCTION"));
    }

    #[test]
    fn from_attributes_builds_full_parameter() {
        let param = BloodParameter::from_attributes(&attributes(json!({
            "name": "Glucose",
            "value": 95,
            "unit": "mg/dL",
            "reference_range": "70-100",
            "category": "DIABETES"
        })))
        .expect("valid parameter");

        assert_eq!(param.name(), "Glucose");
        assert_eq!(param.value(), 95.0);
        assert_eq!(param.unit(), Some("mg/dL"));
        assert_eq!(param.reference_range(), Some("70-100"));
        assert_eq!(param.category(), ParameterCategory::Diabetes);
        assert_eq!(param.confidence(), DEFAULT_PARAMETER_CONFIDENCE);
        assert!(!param.is_abnormal());
    }

    #[test]
    fn from_attributes_accepts_numeric_strings() {
        let param = BloodParameter::from_attributes(&attributes(json!({
            "name": "TSH",
            "value": " 5.9 ",
            "reference_range": "0.4-4.0"
        })))
        .expect("numeric string should coerce");

        assert_eq!(param.value(), 5.9);
        assert_eq!(param.category(), ParameterCategory::Other);
        assert_eq!(param.unit(), None);
        assert!(param.is_abnormal());
    }

    #[test]
    fn from_attributes_skips_uncoercible_values() {
        let err = BloodParameter::from_attributes(&attributes(json!({
            "name": "Hemoglobin",
            "value": "abc"
        })))
        .expect_err("text value should be skipped");
        assert!(matches!(err, SkipReason::UncoercibleValue(raw) if raw.contains("abc")));

        let err = BloodParameter::from_attributes(&attributes(json!({
            "name": "Hemoglobin",
            "value": true
        })))
        .expect_err("boolean value should be skipped");
        assert!(matches!(err, SkipReason::UncoercibleValue(_)));

        let err = BloodParameter::from_attributes(&attributes(json!({
            "name": "Hemoglobin",
            "value": "NaN"
        })))
        .expect_err("non-finite value should be skipped");
        assert!(matches!(err, SkipReason::UncoercibleValue(_)));
    }

    #[test]
    fn from_attributes_requires_name_and_value() {
        assert_eq!(
            BloodParameter::from_attributes(&attributes(json!({ "value": 1.0 }))),
            Err(SkipReason::MissingName)
        );
        assert_eq!(
            BloodParameter::from_attributes(&attributes(json!({ "name": "ALT" }))),
            Err(SkipReason::MissingValue)
        );
        assert_eq!(
            BloodParameter::from_attributes(&attributes(json!({ "name": 7, "value": 1.0 }))),
            Err(SkipReason::NonTextName)
        );
    }

    #[test]
    fn collaborator_confidence_is_used_when_in_bounds() {
        let param = BloodParameter::from_attributes(&attributes(json!({
            "name": "CRP",
            "value": 3,
            "confidence": 0.55
        })))
        .unwrap();
        assert_eq!(param.confidence(), 0.55);

        let param = BloodParameter::from_attributes(&attributes(json!({
            "name": "CRP",
            "value": 3,
            "confidence": 7
        })))
        .unwrap();
        assert_eq!(param.confidence(), DEFAULT_PARAMETER_CONFIDENCE);
    }

    #[test]
    fn patient_info_hint_only_fills_gaps() {
        let mut info = PatientInfo {
            name: Some("Jane Roe".into()),
            ..Default::default()
        };
        info.fill_missing_from(PatientInfo {
            name: Some("Someone Else".into()),
            date_of_birth: Some("1990-02-03".into()),
            gender: None,
        });

        assert_eq!(info.name.as_deref(), Some("Jane Roe"));
        assert_eq!(info.date_of_birth.as_deref(), Some("1990-02-03"));
        assert_eq!(info.gender, None);
    }

    #[test]
    fn patient_info_from_loose_hint() {
        let hint = json!({
            "name": "Jane",
            "dateOfBirth": 19800115,
            "gender": ["F"],
            "ward": "B4"
        });
        let info = PatientInfo::from_hint(hint.as_object().unwrap());

        assert_eq!(info.name.as_deref(), Some("Jane"));
        assert_eq!(info.date_of_birth.as_deref(), Some("19800115"));
        assert_eq!(info.gender, None);
    }

    #[test]
    fn patient_info_hint_accepts_snake_case_and_skips_blank() {
        let hint = json!({ "name": "  ", "date_of_birth": "1980-01-15", "gender": null });
        let info = PatientInfo::from_hint(hint.as_object().unwrap());

        assert_eq!(info.name, None);
        assert_eq!(info.date_of_birth.as_deref(), Some("1980-01-15"));
        assert_eq!(info.gender, None);
    }

    #[test]
    fn patient_info_omits_absent_keys() {
        let info = PatientInfo {
            date_of_birth: Some("01/15/1980".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(info).unwrap(), json!({ "dateOfBirth": "01/15/1980" }));
    }
}
