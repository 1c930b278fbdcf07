//! Requirement Extractor — turns document paragraphs into `RequirementRecord`s.
//!
//! The two text rules (section label, keyword) are pure functions over a single
//! paragraph so the sticky-section behavior can be tested without any files.
//!
//! Trigger rule: a paragraph becomes a record only if it contains the whole word
//! "shall". The reported keyword is then the first of shall/should/must in the
//! text, so "should ... shall" reports "should". Paragraphs with only "should"
//! or "must" are never extracted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::docx::{read_paragraphs, DocxError};
use crate::models::requirement::{requirement_id, Keyword, RequirementRecord};

static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)+)").unwrap());
static TRIGGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bshall\b").unwrap());
static KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(shall|should|must)\b").unwrap());

/// Leading dotted section label (`1.2`, `3.4.1`) of an already-trimmed paragraph.
pub fn section_label(text: &str) -> Option<&str> {
    SECTION_RE.find(text).map(|m| m.as_str())
}

/// Whether the paragraph qualifies for extraction at all.
pub fn has_trigger(text: &str) -> bool {
    TRIGGER_RE.is_match(text)
}

/// First whole-word shall/should/must, in character order.
pub fn first_keyword(text: &str) -> Option<Keyword> {
    KEYWORD_RE
        .find(text)
        .and_then(|m| Keyword::from_match(m.as_str()))
}

/// A qualifying paragraph before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub section: String,
    pub keyword: Keyword,
    pub text: String,
}

/// Applies both rules to one paragraph.
///
/// `current_section` is updated whenever the paragraph starts with a section
/// label, whether or not the paragraph itself qualifies.
pub fn scan_paragraph(raw: &str, current_section: &mut String) -> Option<Candidate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(label) = section_label(text) {
        current_section.clear();
        current_section.push_str(label);
    }

    if !has_trigger(text) {
        return None;
    }

    Some(Candidate {
        section: current_section.clone(),
        keyword: first_keyword(text).unwrap_or(Keyword::Shall),
        text: text.to_string(),
    })
}

/// Scans paragraphs in document order and numbers the qualifying ones `REQ-1..`.
pub fn extract_requirements<I, S>(paragraphs: I) -> Vec<RequirementRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut current_section = String::new();
    let mut records = Vec::new();

    for paragraph in paragraphs {
        if let Some(candidate) = scan_paragraph(paragraph.as_ref(), &mut current_section) {
            records.push(RequirementRecord {
                id: requirement_id(records.len() + 1),
                section: candidate.section,
                keyword: candidate.keyword,
                text: candidate.text,
            });
        }
    }

    records
}

/// Reads a converted `.docx` and extracts its requirements.
pub fn extract_from_docx(docx: &[u8]) -> Result<Vec<RequirementRecord>, DocxError> {
    let paragraphs = read_paragraphs(docx)?;
    Ok(extract_requirements(&paragraphs))
}
