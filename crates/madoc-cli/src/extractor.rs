//! Plain-text adapter for the core's text-extraction boundary.
//!
//! The CLI operates on text already produced by an upstream OCR/extraction
//! step, so "extraction" here is reading a UTF-8 file. The original
//! document format survives as an inner extension: `scan.pdf.txt` reads
//! back as a PDF-sourced document.

use std::path::Path;

use async_trait::async_trait;
use madoc_core::{DocumentType, ExtractError, RawDocumentText, TextExtractor};

pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract_text(&self, path: &Path) -> Result<RawDocumentText, ExtractError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ExtractError::Read(format!("{}: {e}", path.display())))?;

        if text.trim().is_empty() {
            return Err(ExtractError::Empty);
        }

        Ok(RawDocumentText {
            text,
            document_type: source_type(path),
            metadata: serde_json::Map::new(),
        })
    }
}

fn source_type(path: &Path) -> DocumentType {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let inner_ext = Path::new(stem)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match inner_ext.as_str() {
        "pdf" => DocumentType::Pdf,
        "png" | "jpg" | "jpeg" | "tiff" | "gif" | "bmp" => DocumentType::Image,
        "doc" | "docx" => DocumentType::Docx,
        _ => DocumentType::Unknown,
    }
}
