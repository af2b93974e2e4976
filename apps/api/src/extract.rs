//! Résumé bytes to plain UTF-8 text.
//!
//! Only PDF is accepted. Pages are extracted one by one and concatenated in
//! page order without separators. The extraction runs on the blocking pool;
//! a panic inside the PDF parser is reported as an `ExtractionError` instead
//! of taking the request down.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("uploaded document is not a PDF")]
    NotPdf,

    #[error("PDF could not be parsed: {0}")]
    Parse(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

/// Extracts the text of every page of a PDF, in page order.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, ExtractionError> {
    if !data.starts_with(PDF_MAGIC) {
        return Err(ExtractionError::NotPdf);
    }

    let pages =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&data))
            .await
            .map_err(|e| ExtractionError::Parse(format!("extractor aborted: {e}")))?
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    let text = pages.concat();
    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }
    debug!(chars = text.len(), "Extracted résumé text");
    Ok(text)
}

/// Like `extract_pdf_text`, but an unreadable document degrades to empty text.
/// The flag reports whether any text was recovered.
pub async fn extract_or_empty(data: Bytes) -> (String, bool) {
    match extract_pdf_text(data).await {
        Ok(text) => (text, true),
        Err(e) => {
            warn!("Résumé text unavailable: {e}");
            (String::new(), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_pdf_is_rejected() {
        let err = extract_pdf_text(Bytes::from_static(b"PK\x03\x04 docx"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NotPdf));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_error() {
        let err = extract_pdf_text(Bytes::from_static(b"%PDF-1.4\nthis is not a pdf body"))
            .await
            .unwrap_err();
        assert!(!matches!(err, ExtractionError::NotPdf));
    }

    #[tokio::test]
    async fn test_extract_or_empty_degrades_to_empty_text() {
        let (text, available) = extract_or_empty(Bytes::from_static(b"plain text")).await;
        assert!(text.is_empty());
        assert!(!available);
    }

    /// Minimal PDF with one Helvetica text line per page.
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let font_id = 3 + 2 * pages.len();
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }
        let xref = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }

    #[tokio::test]
    async fn test_extracts_pages_in_order() {
        let pdf = pdf_with_pages(&["Rustacean internship", "Genomics pipeline"]);
        let text = extract_pdf_text(Bytes::from(pdf)).await.unwrap();

        let first = text.find("Rustacean internship").unwrap();
        let second = text.find("Genomics pipeline").unwrap();
        assert!(first < second, "pages out of order: {text:?}");
        assert!(!text.contains('\u{c}'));
    }

    #[tokio::test]
    async fn test_extract_or_empty_reports_recovered_text() {
        let pdf = pdf_with_pages(&["Python data analysis"]);
        let (text, available) = extract_or_empty(Bytes::from(pdf)).await;
        assert!(available);
        assert!(text.contains("Python data analysis"));
    }
}
