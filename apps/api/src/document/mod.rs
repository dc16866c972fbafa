//! Supporting-document text for prompts.
//!
//! Documents arrive either inline as base64 text (`document_content`) or as
//! multipart uploads. Uploads are converted to plain text per format, cleaned, and
//! concatenated in the order they were received.

pub mod docx;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid base64 document content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from {kind}: {message}")]
    Extraction { kind: &'static str, message: String },
}

/// Formats we know how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
    Image,
}

impl DocumentKind {
    /// Classifies an upload by MIME type, falling back to the file extension.
    pub fn detect(filename: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let by_mime = content_type.and_then(|mime| {
            let mime = mime.split(';').next().unwrap_or(mime).trim();
            match mime {
                "application/pdf" => Some(DocumentKind::Pdf),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    Some(DocumentKind::Docx)
                }
                m if m.starts_with("text/") => Some(DocumentKind::Text),
                m if m.starts_with("image/") => Some(DocumentKind::Image),
                _ => None,
            }
        });

        by_mime.or_else(|| {
            let ext = filename?.rsplit_once('.')?.1.to_ascii_lowercase();
            match ext.as_str() {
                "pdf" => Some(DocumentKind::Pdf),
                "docx" => Some(DocumentKind::Docx),
                "txt" | "md" | "csv" => Some(DocumentKind::Text),
                "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" | "webp" => {
                    Some(DocumentKind::Image)
                }
                _ => None,
            }
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Text => "text",
            DocumentKind::Image => "image",
        }
    }
}

/// Decodes inline base64 document content. Invalid UTF-8 is replaced, not rejected.
pub fn decode_document_content(encoded: &str) -> Result<String, DocumentError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Drops blank lines and trims the rest.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins documents in order, separated by a blank line. Returns `None` when
/// nothing has content.
pub fn combine_documents<I, S>(texts: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = texts
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

/// Extracts raw text from a document of the given kind.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, DocumentError> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Extraction {
                kind: "pdf",
                message: e.to_string(),
            })
        }
        DocumentKind::Docx => docx::extract_docx_text(bytes),
        DocumentKind::Text => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentKind::Image => Err(DocumentError::UnsupportedFormat(
            "image (OCR is not available)".to_string(),
        )),
    }
}

/// Detects, extracts, and cleans one uploaded file off the async runtime.
pub async fn extract_upload(
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
) -> Result<String, DocumentError> {
    let kind = DocumentKind::detect(filename.as_deref(), content_type.as_deref()).ok_or_else(
        || {
            DocumentError::UnsupportedFormat(
                filename
                    .clone()
                    .or_else(|| content_type.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        },
    )?;

    debug!(kind = kind.as_str(), size = bytes.len(), "Extracting uploaded document");

    let raw = tokio::task::spawn_blocking(move || extract_text(kind, &bytes))
        .await
        .map_err(|e| DocumentError::Extraction {
            kind: kind.as_str(),
            message: e.to_string(),
        })??;

    let cleaned = clean_text(&raw);
    info!(
        kind = kind.as_str(),
        chars = cleaned.len(),
        "Extracted document text"
    );
    Ok(cleaned)
}
