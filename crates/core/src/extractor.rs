//! The seam to the external extraction collaborator.

use crate::annotation::Annotation;
use crate::error::ExtractorError;
use crate::schema::ExtractionSchema;
use async_trait::async_trait;

/// A document-understanding service that turns a report into annotations.
///
/// Implementations must return annotations in the order they appear in the
/// document, with `text` copied verbatim from the source.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(
        &self,
        document: &[u8],
        schema: &ExtractionSchema,
    ) -> Result<Vec<Annotation>, ExtractorError>;
}
