//! Document Converter — PDF text layer to an editable `.docx`.
//!
//! All pages are converted. Paragraph boundaries come from the text layout:
//! blank lines and page breaks end a paragraph, wrapped lines of one block are
//! joined, and a line opening with a section label always starts a new paragraph.

use thiserror::Error;
use tracing::debug;

use crate::extraction::docx::{write_document, DocxError};
use crate::extraction::requirements::section_label;

const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("PDF could not be parsed: {0}")]
    Pdf(String),

    #[error("Failed to write converted document: {0}")]
    Docx(#[from] DocxError),
}

#[derive(Debug)]
pub struct ConvertedDocument {
    pub paragraph_count: usize,
    pub docx: Vec<u8>,
}

pub fn convert_pdf(pdf: &[u8]) -> Result<ConvertedDocument, ConvertError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf)
        .map_err(|e| ConvertError::Pdf(format!("{e:?}")))?;
    debug!(
        "Extracted {} page(s), {} chars of PDF text",
        pages.len(),
        pages.iter().map(String::len).sum::<usize>()
    );

    // Page text carries no boundary marker of its own.
    let text = pages.join(&PAGE_BREAK.to_string());
    let paragraphs = split_paragraphs(&text);
    let docx = write_document(&paragraphs)?;

    Ok(ConvertedDocument {
        paragraph_count: paragraphs.len(),
        docx,
    })
}

pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        for (i, piece) in line.split(PAGE_BREAK).enumerate() {
            if i > 0 {
                flush(&mut block, &mut paragraphs);
            }
            let piece = piece.trim();
            if piece.is_empty() {
                flush(&mut block, &mut paragraphs);
                continue;
            }
            if section_label(piece).is_some() {
                flush(&mut block, &mut paragraphs);
            }
            block.push(piece);
        }
    }
    flush(&mut block, &mut paragraphs);

    paragraphs
}

fn flush(block: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !block.is_empty() {
        paragraphs.push(block.join(" "));
        block.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::docx::read_paragraphs;
    use crate::test_support::{pdf_with_lines, pdf_with_pages};

    #[test]
    fn test_blank_lines_separate_paragraphs() {
        let text = "First block line one\nline two\n\nSecond block\r\n";
        assert_eq!(
            split_paragraphs(text),
            vec!["First block line one line two", "Second block"]
        );
    }

    #[test]
    fn test_section_label_starts_new_paragraph() {
        let text = "Intro text\n1.2 Scope\nThe system shall boot.";
        assert_eq!(
            split_paragraphs(text),
            vec!["Intro text", "1.2 Scope The system shall boot."]
        );
    }

    #[test]
    fn test_page_break_ends_paragraph() {
        let text = "end of page one\x0cstart of page two";
        assert_eq!(
            split_paragraphs(text),
            vec!["end of page one", "start of page two"]
        );
    }

    #[test]
    fn test_page_break_inside_wrapped_block() {
        let text = "wrapped line one\nline two\x0c\x0cnext page\ncontinues";
        assert_eq!(
            split_paragraphs(text),
            vec!["wrapped line one line two", "next page continues"]
        );
    }

    #[test]
    fn test_empty_text_has_no_paragraphs() {
        assert!(split_paragraphs("\n\n  \n").is_empty());
    }

    #[test]
    fn test_convert_generated_pdf() {
        let pdf = pdf_with_lines(&["1.1 General", "The controller shall start."]);
        let converted = convert_pdf(&pdf).unwrap();
        assert!(converted.paragraph_count >= 1);

        let paragraphs = read_paragraphs(&converted.docx).unwrap();
        let joined = paragraphs.join(" ");
        assert!(joined.contains("1.1 General"), "got {paragraphs:?}");
        assert!(joined.contains("shall start"), "got {paragraphs:?}");
    }

    #[test]
    fn test_two_page_pdf_splits_at_page_boundary() {
        let pdf = pdf_with_pages(&[&["end of page one"], &["start of page two"]]);
        let converted = convert_pdf(&pdf).unwrap();

        let paragraphs: Vec<String> = read_paragraphs(&converted.docx)
            .unwrap()
            .iter()
            .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        assert_eq!(converted.paragraph_count, paragraphs.len());
        assert_eq!(paragraphs, vec!["end of page one", "start of page two"]);
    }

    #[test]
    fn test_garbage_is_pdf_error() {
        assert!(matches!(
            convert_pdf(b"this is not a pdf"),
            Err(ConvertError::Pdf(_))
        ));
    }
}
