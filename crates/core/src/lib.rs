//! # Bloodwork Core
//!
//! Core logic for the blood test extraction service.
//!
//! This crate contains:
//! - The annotation vocabulary shared with the extraction collaborator
//! - Reference range evaluation ([`range`])
//! - Normalisation of annotations into typed records ([`normalize`])
//! - The fixed extraction schema ([`schema`])
//! - The single-shot extraction flow ([`BloodTestExtractor`]) and upload encoding
//!
//! **No API concerns**: HTTP servers, routing and wire formats belong in `api-rest` and
//! `api-shared`. The collaborator itself is reached through the [`Extractor`] trait and
//! implemented in `gemini-client`.

pub mod annotation;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod range;
pub mod schema;
pub mod upload;

pub use annotation::{Annotation, AnnotationClass};
pub use config::{ConfigError, EnvValues, ServiceConfig};
pub use error::{ExtractResult, ExtractionError, ExtractorError};
pub use extractor::Extractor;
pub use model::{
    BloodParameter, ExtractionResult, ParameterCategory, PatientInfo, SkipReason, TestInfo,
};
pub use normalize::normalize;
pub use orchestrator::BloodTestExtractor;
pub use range::{is_abnormal, ReferenceRange};
pub use schema::{ExtractionSchema, WorkedExample};
pub use upload::{store_upload, EncodedUpload};
