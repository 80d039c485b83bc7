//! # API Shared
//!
//! Shared wire types for the blood test extraction API.
//!
//! Contains:
//! - Request and response bodies (`types` module), annotated for OpenAPI
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`. Domain types such as `ExtractionResult` come from `bloodwork-core`.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
