//! Request and response bodies for the REST API.

use bloodwork_core::{EncodedUpload, PatientInfo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Body of `POST /extract-blood-test`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ExtractBloodTestReq {
    /// Base64-encoded PDF report.
    pub pdf_base64: String,
    /// Known patient details, used where the report itself is silent.
    /// Any JSON object is accepted. Unrecognised keys are ignored.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub patient_info: Option<Map<String, Value>>,
}

impl ExtractBloodTestReq {
    pub fn patient_hint(&self) -> Option<PatientInfo> {
        self.patient_info.as_ref().map(PatientInfo::from_hint)
    }
}

/// Body returned by `POST /upload-pdf`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UploadPdfRes {
    pub base64_data: String,
    pub filename: String,
}

impl From<EncodedUpload> for UploadPdfRes {
    fn from(upload: EncodedUpload) -> Self {
        Self {
            base64_data: upload.base64_data,
            filename: upload.filename,
        }
    }
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub service: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

impl ErrorRes {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_request_patient_info_is_optional() {
        let req: ExtractBloodTestReq =
            serde_json::from_value(json!({ "pdf_base64": "JVBERi0xLjc=" })).unwrap();
        assert!(req.patient_info.is_none());
    }

    #[test]
    fn extract_request_accepts_partial_patient_info() {
        let req: ExtractBloodTestReq = serde_json::from_value(json!({
            "pdf_base64": "JVBERi0xLjc=",
            "patient_info": { "name": "Jane Roe", "mrn": "12345" }
        }))
        .unwrap();

        let info = req.patient_hint().expect("patient info present");
        assert_eq!(info.name.as_deref(), Some("Jane Roe"));
        assert_eq!(info.date_of_birth, None);
    }

    #[test]
    fn extract_request_tolerates_loosely_typed_patient_info() {
        let req: ExtractBloodTestReq = serde_json::from_value(json!({
            "pdf_base64": "JVBERi0xLjc=",
            "patient_info": { "name": "Jane", "dateOfBirth": 19800115, "age": 44 }
        }))
        .unwrap();

        let info = req.patient_hint().expect("patient info present");
        assert_eq!(info.date_of_birth.as_deref(), Some("19800115"));
    }
}
