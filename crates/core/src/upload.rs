//! Re-encoding of uploaded documents.

use crate::constants::DOCUMENT_EXTENSIONS;
use crate::error::{ExtractResult, ExtractionError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// An uploaded document, base64 encoded for a later extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedUpload {
    pub base64_data: String,
    pub filename: String,
}

/// Whether `filename` ends in a recognised document extension.
///
/// The comparison ignores case, so `REPORT.PDF` is accepted.
pub fn has_document_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Validate the filename of an upload and base64 encode its bytes.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsupportedFileType`] when the filename does not
/// end in a recognised document extension.
pub fn store_upload(file_bytes: &[u8], filename: &str) -> ExtractResult<EncodedUpload> {
    if !has_document_extension(filename) {
        return Err(ExtractionError::UnsupportedFileType(filename.to_string()));
    }

    Ok(EncodedUpload {
        base64_data: STANDARD.encode(file_bytes),
        filename: filename.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_pdf_uploads() {
        let upload = store_upload(b"%PDF-1.7", "report.pdf").expect("pdf should be accepted");
        assert_eq!(upload.base64_data, "JVBERi0xLjc=");
        assert_eq!(upload.filename, "report.pdf");
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(has_document_extension("BLOODS.PDF"));
        assert!(has_document_extension("scan.2024.Pdf"));
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["report.docx", "report", "report.pdf.exe", ".pdf", "pdf"] {
            let err = store_upload(b"data", name).expect_err("should reject");
            assert!(matches!(err, ExtractionError::UnsupportedFileType(n) if n == name));
        }
    }

    #[test]
    fn empty_files_are_still_encoded() {
        let upload = store_upload(&[], "empty.pdf").unwrap();
        assert_eq!(upload.base64_data, "");
    }
}
