// src/services/extractor.rs

//! PDF text extraction.
//!
//! Extraction is best-effort per page: a page whose content cannot be
//! decoded contributes nothing. Only a buffer that is not a PDF at all is
//! an error.

use lopdf::Document;

use crate::error::{AppError, Result};

/// Converts raw document bytes into normalized plain text.
#[cfg_attr(test, mockall::automock)]
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// [`TextExtractor`] backed by `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let document = Document::load_mem(bytes).map_err(AppError::extraction)?;
        let pages = document.get_pages();

        let mut page_texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(raw) => {
                    let text = normalize_page(&raw);
                    if text.is_empty() {
                        log::debug!("Page {} has no extractable text", page_number);
                    } else {
                        page_texts.push(text);
                    }
                }
                Err(e) => log::debug!("Skipping page {}: {}", page_number, e),
            }
        }

        log::info!(
            "Extracted text from {}/{} pages",
            page_texts.len(),
            pages.len()
        );

        Ok(page_texts.join("\n").trim().to_string())
    }
}

/// Unify line endings and drop trailing whitespace left by the decoder.
fn normalize_page(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    use super::*;

    /// Page fixture for [`build_pdf`].
    enum Page<'a> {
        Text(&'a str),
        /// No content stream at all
        Blank,
        /// Content reference to an object that does not exist
        Broken,
    }

    /// Build an in-memory PDF with one page per entry.
    fn build_pdf(pages: &[Page<'_>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Resources" => resources_id,
            };
            match page {
                Page::Blank => {}
                Page::Broken => {
                    page_dict.set("Resources", dictionary! {});
                    page_dict.set("Contents", Object::Reference((9999, 0)));
                }
                Page::Text(text) => {
                    let content = Content {
                        operations: vec![
                            Operation::new("BT", vec![]),
                            Operation::new("Tf", vec!["F1".into(), 24.into()]),
                            Operation::new("Td", vec![100.into(), 600.into()]),
                            Operation::new("Tj", vec![Object::string_literal(*text)]),
                            Operation::new("ET", vec![]),
                        ],
                    };
                    let content_id =
                        doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                    page_dict.set("Contents", content_id);
                }
            }
            kids.push(doc.add_object(page_dict).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extracts_single_page() {
        let pdf = build_pdf(&[Page::Text("Hello World")]);
        let text = PdfTextExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "Hello World");
    }

    #[test]
    fn test_pages_joined_in_order() {
        let pdf = build_pdf(&[Page::Text("Page one"), Page::Text("Page two")]);
        let text = PdfTextExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "Page one\nPage two");
    }

    #[test]
    fn test_blank_page_contributes_nothing() {
        let pdf = build_pdf(&[Page::Text("Intro"), Page::Blank, Page::Text("Appendix")]);
        let text = PdfTextExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "Intro\nAppendix");
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let pdf = build_pdf(&[Page::Text("Intro"), Page::Broken, Page::Text("Appendix")]);
        let text = PdfTextExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text, "Intro\nAppendix");
    }

    #[test]
    fn test_document_without_text_is_empty_not_error() {
        let pdf = build_pdf(&[Page::Blank]);
        let text = PdfTextExtractor::new().extract(&pdf).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = PdfTextExtractor::new()
            .extract(b"<html>not a pdf</html>")
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page("a\r\nb  \n\n"), "a\nb");
        assert_eq!(normalize_page("   \n"), "");
    }
}
