//! Constants used throughout the bloodwork core crate.
//!
//! Defaults for runtime configuration live here alongside the fixed values the
//! normaliser applies, so that the HTTP layer and tests agree on them.

/// Confidence assigned to a parameter when the collaborator does not report one.
pub const DEFAULT_PARAMETER_CONFIDENCE: f64 = 0.8;

/// Confidence reported for a whole extraction.
pub const OVERALL_CONFIDENCE: f64 = 0.8;

/// Default Gemini model used for extraction.
pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";

/// Default base URL of the Gemini REST API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default hard timeout, in seconds, for a single collaborator call.
pub const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 120;

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";

/// Default maximum request body size (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// File extensions accepted by the upload endpoint, without the leading dot.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// MIME type sent to the collaborator alongside the document bytes.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "blood-test-extraction";
