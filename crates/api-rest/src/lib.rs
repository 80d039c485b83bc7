//! # API REST
//!
//! REST API for the blood test extraction service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, multipart upload, CORS, body limits)
//!
//! Uses `api-shared` for wire types and `bloodwork-core` for the extraction flow.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ErrorRes, ExtractBloodTestReq, HealthRes, HealthService, UploadPdfRes};
use bloodwork_core::{
    BloodParameter, BloodTestExtractor, ExtractionResult, ParameterCategory, PatientInfo,
    TestInfo,
};

type ApiError = (StatusCode, Json<ErrorRes>);

/// Application state shared across REST API handlers
///
/// Holds only immutable, cheaply clonable services; no request ever waits on a lock.
#[derive(Clone)]
pub struct AppState {
    extractor: BloodTestExtractor,
}

impl AppState {
    pub fn new(extractor: BloodTestExtractor) -> Self {
        Self { extractor }
    }
}

/// Multipart body of `POST /upload-pdf`, for documentation only.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct UploadPdfForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, extract_blood_test, upload_pdf),
    components(schemas(
        HealthRes,
        ErrorRes,
        ExtractBloodTestReq,
        UploadPdfRes,
        UploadPdfForm,
        ExtractionResult,
        BloodParameter,
        ParameterCategory,
        PatientInfo,
        TestInfo,
    ))
)]
pub struct ApiDoc;

/// Build the REST router.
///
/// `body_limit` caps request bodies, which bounds both JSON extraction requests and
/// multipart uploads.
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/extract-blood-test", post(extract_blood_test))
        .route("/upload-pdf", post(upload_pdf))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Used for monitoring and load balancer health checks. Never calls the extraction
/// service.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/extract-blood-test",
    request_body = ExtractBloodTestReq,
    responses(
        (status = 200, description = "Extracted blood test", body = ExtractionResult),
        (status = 400, description = "Malformed base64 document", body = ErrorRes),
        (status = 413, description = "Request body too large", body = ErrorRes),
        (status = 422, description = "Request body is not a valid extraction request", body = ErrorRes),
        (status = 500, description = "Extraction failed", body = ErrorRes)
    )
)]
/// Extract blood test parameters from a base64-encoded PDF
///
/// # Errors
/// Returns `400 Bad Request` if the document is not valid base64, and
/// `500 Internal Server Error` if the extraction service fails or times out. A body
/// that cannot be read as a request keeps the status axum assigns it (413, 415, 422).
/// All of them carry `{"detail": "Extraction failed: <message>"}`.
#[axum::debug_handler]
async fn extract_blood_test(
    State(state): State<AppState>,
    payload: Result<Json<ExtractBloodTestReq>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!("Rejected extraction request: {}", rejection.body_text());
        (
            rejection.status(),
            Json(ErrorRes::new(format!(
                "Extraction failed: {}",
                rejection.body_text()
            ))),
        )
    })?;

    match state.extractor.extract(&req.pdf_base64, req.patient_hint()).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            tracing::error!("Extraction error: {:?}", e);
            Err((status, Json(ErrorRes::new(format!("Extraction failed: {e}")))))
        }
    }
}

#[utoipa::path(
    post,
    path = "/upload-pdf",
    request_body(content = UploadPdfForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Base64-encoded document", body = UploadPdfRes),
        (status = 400, description = "Missing file, not a PDF, or not a multipart body", body = ErrorRes),
        (status = 413, description = "Upload too large", body = ErrorRes),
        (status = 500, description = "File could not be read", body = ErrorRes)
    )
)]
/// Upload a PDF and return it base64 encoded
///
/// Reads the multipart field named `file`. The filename must end in `.pdf`.
///
/// # Errors
/// Returns `400 Bad Request` if there is no `file` field or its filename is not a PDF,
/// and `500 Internal Server Error` if the upload cannot be read.
#[axum::debug_handler]
async fn upload_pdf(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadPdfRes>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        (
            rejection.status(),
            Json(ErrorRes::new(rejection.body_text())),
        )
    })?;

    while let Some(field) = multipart.next_field().await.map_err(read_failure)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(read_failure)?;
        let upload = bloodwork_core::store_upload(&bytes, &filename).map_err(|e| {
            if e.is_client_error() {
                only_pdf()
            } else {
                read_failure(e)
            }
        })?;

        tracing::info!(filename = %upload.filename, bytes = bytes.len(), "PDF uploaded");
        return Ok(Json(upload.into()));
    }

    Err((
        StatusCode::BAD_REQUEST,
        Json(ErrorRes::new("No file uploaded")),
    ))
}

fn only_pdf() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorRes::new("Only PDF files are allowed")),
    )
}

fn read_failure(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Upload read error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorRes::new(format!("File processing failed: {e}"))),
    )
}
