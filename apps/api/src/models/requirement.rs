/// Requirement-indicating terms, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Shall,
    Should,
    Must,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Shall => "shall",
            Keyword::Should => "should",
            Keyword::Must => "must",
        }
    }

    /// Case-insensitive lookup of a matched word.
    pub fn from_match(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "shall" => Some(Keyword::Shall),
            "should" => Some(Keyword::Should),
            "must" => Some(Keyword::Must),
            _ => None,
        }
    }
}

/// One extracted requirement sentence. Lives only for the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementRecord {
    /// `REQ-<n>`, 1-based, contiguous within one extraction run.
    pub id: String,
    /// Most recent section label seen before this paragraph; empty if none.
    pub section: String,
    pub keyword: Keyword,
    /// Full trimmed paragraph text.
    pub text: String,
}

pub const ID_PREFIX: &str = "REQ-";

pub fn requirement_id(ordinal: usize) -> String {
    format!("{ID_PREFIX}{ordinal}")
}
