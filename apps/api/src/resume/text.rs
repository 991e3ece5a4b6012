//! Document decoding for resume uploads: PDF, DOCX, or anything else as lossy UTF-8.
//!
//! Decoding is CPU-bound, so the PDF and DOCX paths run inside `spawn_blocking`.

use std::io::{Cursor, Read};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive could not be opened: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX archive has no word/document.xml")]
    MissingDocumentXml,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// What the client told us about the upload.
#[derive(Debug, Clone, Default)]
pub struct DocumentHint {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentHint {
    /// MIME type wins; the file extension is the fallback.
    pub fn kind(&self) -> DocumentKind {
        match self.content_type.as_deref() {
            Some(PDF_MIME) => return DocumentKind::Pdf,
            Some(DOCX_MIME) => return DocumentKind::Docx,
            _ => {}
        }

        let extension = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("docx") => DocumentKind::Docx,
            _ => DocumentKind::PlainText,
        }
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, content: Bytes, hint: &DocumentHint)
        -> Result<String, ExtractError>;
}

/// Production extractor. DOCX flattening regexes are compiled once and shared with
/// the blocking decode tasks.
#[derive(Clone)]
pub struct DocumentTextExtractor {
    docx: Arc<DocxFlattener>,
}

impl Default for DocumentTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self {
            docx: Arc::new(DocxFlattener::new()),
        }
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract_text(
        &self,
        content: Bytes,
        hint: &DocumentHint,
    ) -> Result<String, ExtractError> {
        let kind = hint.kind();
        debug!("Extracting {:?} text from {} bytes", kind, content.len());

        match kind {
            DocumentKind::PlainText => Ok(String::from_utf8_lossy(&content).into_owned()),
            DocumentKind::Pdf => run_blocking(move || extract_pdf(&content)).await,
            DocumentKind::Docx => {
                let docx = Arc::clone(&self.docx);
                run_blocking(move || docx.extract(&content)).await
            }
        }
    }
}

async fn run_blocking<F>(job: F) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

fn extract_pdf(content: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(content).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Turns `word/document.xml` into plain text.
struct DocxFlattener {
    breaks: Regex,
    tabs: Regex,
    tags: Regex,
}

impl DocxFlattener {
    fn new() -> Self {
        Self {
            breaks: Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("Invalid DOCX break regex"),
            tabs: Regex::new(r"<w:tab\s*/>").expect("Invalid DOCX tab regex"),
            tags: Regex::new(r"<[^>]*>").expect("Invalid DOCX tag regex"),
        }
    }

    fn extract(&self, content: &[u8]) -> Result<String, ExtractError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(content))?;
        let mut xml = String::new();
        match archive.by_name(DOCX_BODY) {
            Ok(mut file) => {
                file.read_to_string(&mut xml)?;
            }
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ExtractError::MissingDocumentXml)
            }
            Err(e) => return Err(e.into()),
        }
        Ok(self.flatten(&xml))
    }

    /// Paragraph and break elements become newlines, tabs become tabs, every other tag
    /// is dropped, then the five predefined XML entities are unescaped.
    fn flatten(&self, xml: &str) -> String {
        let text = self.breaks.replace_all(xml, "\n");
        let text = self.tabs.replace_all(&text, "\t");
        let text = self.tags.replace_all(&text, "");

        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_hint(file_name: Option<&str>, content_type: Option<&str>) -> DocumentHint {
        DocumentHint {
            file_name: file_name.map(str::to_string),
            content_type: content_type.map(str::to_string),
        }
    }

    fn make_docx(entries: &[(&str, &str)]) -> Bytes {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[test]
    fn test_kind_prefers_mime_type() {
        assert_eq!(make_hint(Some("cv.txt"), Some(PDF_MIME)).kind(), DocumentKind::Pdf);
        assert_eq!(make_hint(None, Some(DOCX_MIME)).kind(), DocumentKind::Docx);
    }

    #[test]
    fn test_kind_falls_back_to_extension() {
        assert_eq!(
            make_hint(Some("Resume.PDF"), Some("application/octet-stream")).kind(),
            DocumentKind::Pdf
        );
        assert_eq!(make_hint(Some("cv.docx"), None).kind(), DocumentKind::Docx);
        assert_eq!(make_hint(Some("cv.md"), None).kind(), DocumentKind::PlainText);
        assert_eq!(make_hint(None, None).kind(), DocumentKind::PlainText);
    }

    #[test]
    fn test_docx_xml_is_flattened() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Skills</w:t></w:r></w:p><w:p><w:r><w:t>Rust &amp; Go</w:t><w:tab/><w:t>&lt;fast&gt;</w:t></w:r></w:p></w:body></w:document>"#;
        let flattener = DocxFlattener::new();
        assert_eq!(flattener.flatten(xml), "Skills\nRust & Go\t<fast>");
        // same instance, second document
        assert_eq!(flattener.flatten("<w:p><w:t>Go</w:t></w:p>"), "Go");
    }

    #[tokio::test]
    async fn test_plain_text_is_decoded_lossily() {
        let content = Bytes::from_static(b"Skills: Rust\xff");
        let text = DocumentTextExtractor::new()
            .extract_text(content, &make_hint(Some("cv.txt"), Some("text/plain")))
            .await
            .unwrap();
        assert!(text.starts_with("Skills: Rust"));
        assert!(text.ends_with('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_docx_archive_is_read() {
        let docx = make_docx(&[(
            DOCX_BODY,
            "<w:document><w:p><w:t>Education</w:t></w:p><w:p><w:t>BSc Physics, MIT 2010</w:t></w:p></w:document>",
        )]);
        let text = DocumentTextExtractor::new()
            .extract_text(docx, &make_hint(Some("cv.docx"), None))
            .await
            .unwrap();
        assert_eq!(text, "Education\nBSc Physics, MIT 2010");
    }

    #[tokio::test]
    async fn test_docx_without_body_fails() {
        let docx = make_docx(&[("word/styles.xml", "<w:styles/>")]);
        let result = DocumentTextExtractor::new()
            .extract_text(docx, &make_hint(Some("cv.docx"), None))
            .await;
        assert!(matches!(result, Err(ExtractError::MissingDocumentXml)));
    }

    #[tokio::test]
    async fn test_corrupt_inputs_fail() {
        let garbage = Bytes::from_static(b"definitely not a zip");
        let docx = DocumentTextExtractor::new()
            .extract_text(garbage.clone(), &make_hint(Some("cv.docx"), None))
            .await;
        assert!(matches!(docx, Err(ExtractError::Archive(_))));

        let pdf = DocumentTextExtractor::new()
            .extract_text(garbage, &make_hint(Some("cv.pdf"), None))
            .await;
        assert!(pdf.is_err());
    }
}
