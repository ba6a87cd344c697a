use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Double-quoted substring: "Movie Title"
static QUOTED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("Invalid quoted title pattern"));

/// Outcome of turning completion text into candidate titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateParse {
    /// The text was a JSON array of strings
    Parsed(Vec<String>),
    /// Titles recovered by scanning for quoted substrings
    Salvaged(Vec<String>),
    /// Nothing usable in the text
    Empty,
}

/// Wire tag for a `CandidateParse`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParseKind {
    Parsed,
    Salvaged,
    Empty,
}

impl CandidateParse {
    pub fn kind(&self) -> ParseKind {
        match self {
            CandidateParse::Parsed(_) => ParseKind::Parsed,
            CandidateParse::Salvaged(_) => ParseKind::Salvaged,
            CandidateParse::Empty => ParseKind::Empty,
        }
    }

    pub fn titles(&self) -> &[String] {
        match self {
            CandidateParse::Parsed(titles) | CandidateParse::Salvaged(titles) => titles,
            CandidateParse::Empty => &[],
        }
    }

    pub fn into_titles(self) -> Vec<String> {
        match self {
            CandidateParse::Parsed(titles) | CandidateParse::Salvaged(titles) => titles,
            CandidateParse::Empty => Vec::new(),
        }
    }
}

/// Strict parse first, quote scan second
pub fn parse_candidates(text: &str) -> CandidateParse {
    if let Some(titles) = parse_strict(text) {
        CandidateParse::Parsed(titles)
    } else if let Some(titles) = salvage_quoted(text) {
        CandidateParse::Salvaged(titles)
    } else {
        CandidateParse::Empty
    }
}

/// Parses the text as a JSON array of strings, tolerating a markdown fence
pub fn parse_strict(text: &str) -> Option<Vec<String>> {
    let titles: Vec<String> = serde_json::from_str(strip_code_fence(text)).ok()?;
    non_empty(titles)
}

/// Collects every double-quoted substring in the text
pub fn salvage_quoted(text: &str) -> Option<Vec<String>> {
    let titles = QUOTED_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    non_empty(titles)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

fn non_empty(titles: Vec<String>) -> Option<Vec<String>> {
    let titles: Vec<String> = titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if titles.is_empty() {
        None
    } else {
        Some(titles)
    }
}
