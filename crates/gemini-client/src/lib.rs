//! Gemini extraction collaborator
//!
//! A minimal client for the Gemini `generateContent` REST API that implements
//! [`bloodwork_core::Extractor`]. The document is sent inline alongside the
//! rendered extraction schema, and the model is asked to reply with a JSON list
//! of annotations.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::GeminiClient;
//! use std::time::Duration;
//!
//! let client = GeminiClient::new(api_key, "gemini-2.5-flash", Duration::from_secs(120))?;
//! let annotations = client.extract(&pdf_bytes, &ExtractionSchema::blood_test()).await?;
//! ```

pub mod types;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bloodwork_core::constants::{DEFAULT_GEMINI_BASE_URL, PDF_MIME_TYPE};
use bloodwork_core::{Annotation, ExtractionSchema, Extractor, ExtractorError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client whose requests are abandoned after `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExtractorError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractorError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Set a custom base URL (for proxies or a local stub).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Extractor for GeminiClient {
    async fn extract(
        &self,
        document: &[u8],
        schema: &ExtractionSchema,
    ) -> Result<Vec<Annotation>, ExtractorError> {
        let start = std::time::Instant::now();
        let request = build_request(document, schema)?;

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                ExtractorError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");
            return Err(ExtractorError::Api(format!("Gemini returned {status}: {error_text}")));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExtractorError::Parse(e.to_string()))?;

        let annotations = annotations_from_response(&body)?;

        debug!(
            model = %self.model,
            annotations = annotations.len(),
            duration_ms = start.elapsed().as_millis(),
            "Gemini extraction"
        );

        Ok(annotations)
    }
}

/// Render the schema into the instruction text sent with the document.
pub fn render_instructions(schema: &ExtractionSchema) -> Result<String, ExtractorError> {
    let mut text = schema.prompt.trim().to_string();
    text.push_str(
        "\n\nRespond with a JSON object of the form {\"extractions\": [...]}. Each item has \
         \"extraction_class\" (one of patient_name, date_of_birth, gender, test_date, lab_name, \
         report_number, parameter), \"extraction_text\" copied verbatim from the document, and \
         \"attributes\". Only parameter items carry attributes: name, value, unit, \
         reference_range and category. List items in the order they appear in the document.",
    );

    for example in &schema.examples {
        let expected = serde_json::json!({ "extractions": example.extractions });
        let expected = serde_json::to_string_pretty(&expected)
            .map_err(|e| ExtractorError::Parse(format!("failed to render example: {e}")))?;
        text.push_str("\n\nExample document:\n");
        text.push_str(&example.text);
        text.push_str("\n\nExample output:\n");
        text.push_str(&expected);
    }

    text.push_str("\n\nNow extract from the attached document.");
    Ok(text)
}

/// Build the `generateContent` body for one document.
pub fn build_request(
    document: &[u8],
    schema: &ExtractionSchema,
) -> Result<GenerateContentRequest, ExtractorError> {
    Ok(GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::text(render_instructions(schema)?),
            Part::inline(PDF_MIME_TYPE, STANDARD.encode(document)),
        ])],
        generation_config: GenerationConfig::default(),
    })
}

fn annotations_from_response(
    body: &GenerateContentResponse,
) -> Result<Vec<Annotation>, ExtractorError> {
    if let Some(reason) = body
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ExtractorError::Api(format!("prompt blocked: {reason}")));
    }

    let text = body.first_text().ok_or_else(|| {
        let reason = body
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_else(|| "no candidates".into());
        ExtractorError::Parse(format!("Gemini returned no text ({reason})"))
    })?;

    parse_annotations(&text)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationPayload {
    Wrapped { extractions: Vec<Value> },
    Bare(Vec<Value>),
}

/// Parse the model's reply into annotations.
///
/// Accepts `{"extractions": [...]}` or a bare array, optionally wrapped in a
/// Markdown code fence. Items that do not read as an annotation are skipped,
/// but a reply that is not a list at all is a [`ExtractorError::Parse`].
pub fn parse_annotations(text: &str) -> Result<Vec<Annotation>, ExtractorError> {
    let text = strip_code_fence(text);
    let payload: AnnotationPayload = serde_json::from_str(text)
        .map_err(|e| ExtractorError::Parse(format!("unparsable extraction result: {e}")))?;

    let items = match payload {
        AnnotationPayload::Wrapped { extractions } => extractions,
        AnnotationPayload::Bare(extractions) => extractions,
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Annotation>(item) {
            Ok(annotation) => Some(annotation),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed annotation");
                None
            }
        })
        .collect())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
