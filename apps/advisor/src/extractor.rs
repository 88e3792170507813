//! Text Extractor — turns a PDF resume into plain text via `pdf-extract`.

use std::panic;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a readable PDF: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Reads the PDF at `path` and returns the text of every page in document order.
/// Image-only documents yield an empty string.
pub fn extract(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    // pdf-extract unwraps on structurally broken documents (no MediaBox,
    // undeclared fonts); those panics are reported as parse failures.
    let parsed = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes));
    let text = match parsed {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            return Err(ExtractError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        Err(cause) => {
            return Err(ExtractError::Parse {
                path: path.to_path_buf(),
                message: format!("PDF parser panicked: {}", panic_message(&*cause)),
            })
        }
    };

    debug!(
        "Extracted {} characters from {}",
        text.chars().count(),
        path.display()
    );
    Ok(text)
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> &str {
    cause
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| cause.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("malformed document")
}

/// First `limit` characters of `text`, with `...` appended when truncated.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Hand-assembled PDFs with a correct xref table, for tests that need real documents.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;

    use tempfile::NamedTempFile;

    const FONT: &str = "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>";

    /// Serializes `objects` as objects 1..=n; object 1 must be the catalog.
    pub fn build_pdf(objects: &[String]) -> Vec<u8> {
        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_at = out.len();
        let size = objects.len() + 1;
        out.extend_from_slice(format!("xref\n0 {size}\n0000000000 65535 f \n").as_bytes());
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n")
                .as_bytes(),
        );
        out
    }

    fn content_stream(operators: &str) -> String {
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            operators.len(),
            operators
        )
    }

    fn one_page(page: &str, operators: &str) -> Vec<u8> {
        build_pdf(&[
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            page.to_string(),
            content_stream(operators),
            FONT.to_string(),
        ])
    }

    /// A valid single-page document showing `text` in Helvetica.
    pub fn single_page_pdf(text: &str) -> Vec<u8> {
        one_page(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
            &format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET"),
        )
    }

    /// A valid page whose content stream draws no text.
    pub fn blank_page_pdf() -> Vec<u8> {
        one_page(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
            "",
        )
    }

    /// Structurally broken: the page declares no MediaBox.
    pub fn page_without_media_box_pdf() -> Vec<u8> {
        one_page(
            "<< /Type /Page /Parent 2 0 R \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
            "BT /F1 12 Tf 72 720 Td (Jane Roe) Tj ET",
        )
    }

    /// Structurally broken: the content stream selects a font the page never declares.
    pub fn undeclared_font_pdf() -> Vec<u8> {
        one_page(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << >> /Contents 4 0 R >>",
            "BT /F9 12 Tf 72 720 Td (Jane Roe) Tj ET",
        )
    }

    pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }
}
