use crate::error::{EngineError, Result};
use crate::{DocId, Document};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// A document with at least one pattern match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub doc_id: DocId,
    pub name: String,
    pub content: String,
    /// Half-open `[start, end)` character offsets into `content`.
    pub highlights: Vec<[usize; 2]>,
}

pub fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| EngineError::InvalidPattern(e.to_string()))
}

/// Run a case-insensitive pattern over every document's raw content.
/// Documents without matches are left out.
pub fn search_pattern(pattern: &str, documents: &[Document]) -> Result<Vec<PatternMatch>> {
    let re = compile(pattern)?;
    let matches: Vec<PatternMatch> = documents
        .iter()
        .filter_map(|doc| {
            let highlights = highlight_spans(&re, &doc.content);
            if highlights.is_empty() {
                return None;
            }
            Some(PatternMatch {
                doc_id: doc.id,
                name: doc.name.clone(),
                content: doc.content.clone(),
                highlights,
            })
        })
        .collect();
    tracing::debug!(documents = documents.len(), matched = matches.len(), "pattern search");
    Ok(matches)
}

/// Non-overlapping match spans in scan order, as character offsets.
/// Zero-width matches carry nothing to highlight and are skipped.
pub fn highlight_spans(re: &Regex, text: &str) -> Vec<[usize; 2]> {
    let mut spans = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        char_pos += text[byte_pos..m.start()].chars().count();
        let start = char_pos;
        char_pos += m.as_str().chars().count();
        byte_pos = m.end();
        spans.push([start, char_pos]);
    }
    spans
}
