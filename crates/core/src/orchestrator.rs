//! Single-shot extraction flow: decode, call the collaborator, normalise.
//!
//! Each call is independent. The service holds only immutable shared state, so
//! concurrent requests never contend on a lock while the collaborator call is
//! in flight.

use crate::error::{ExtractResult, ExtractionError};
use crate::extractor::Extractor;
use crate::model::{ExtractionResult, PatientInfo};
use crate::normalize::normalize;
use crate::schema::ExtractionSchema;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use std::time::Duration;

/// Runs blood test extractions against a collaborator.
#[derive(Clone)]
pub struct BloodTestExtractor {
    extractor: Arc<dyn Extractor>,
    schema: Arc<ExtractionSchema>,
    timeout: Duration,
}

impl BloodTestExtractor {
    /// Create a service calling `extractor`, failing any call that takes
    /// longer than `timeout`.
    pub fn new(extractor: Arc<dyn Extractor>, timeout: Duration) -> Self {
        Self {
            extractor,
            schema: Arc::new(ExtractionSchema::blood_test()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Extract a blood test report supplied as base64-encoded PDF bytes.
    ///
    /// `patient_info_hint` only fills patient fields the document itself did
    /// not yield.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::InvalidInput`] if `pdf_base64` is not valid base64.
    /// - [`ExtractionError::Collaborator`] if the collaborator fails.
    /// - [`ExtractionError::Timeout`] if the collaborator exceeds the timeout.
    ///
    /// There is no retry and no partial result.
    pub async fn extract(
        &self,
        pdf_base64: &str,
        patient_info_hint: Option<PatientInfo>,
    ) -> ExtractResult<ExtractionResult> {
        // Line-wrapped encodings (76 columns, MIME style) are common.
        let compact: String = pdf_base64
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let document = STANDARD
            .decode(compact)
            .map_err(|e| ExtractionError::InvalidInput(format!("malformed base64: {e}")))?;

        tracing::debug!(bytes = document.len(), "calling extraction service");

        let annotations = tokio::time::timeout(
            self.timeout,
            self.extractor.extract(&document, &self.schema),
        )
        .await
        .map_err(|_| ExtractionError::Timeout(self.timeout))??;

        let mut result = normalize(annotations);
        if let Some(hint) = patient_info_hint {
            result.patient_info.fill_missing_from(hint);
        }

        tracing::info!(
            parameters = result.parameters.len(),
            abnormal = result.abnormal_count(),
            "blood test extracted"
        );

        Ok(result)
    }
}
