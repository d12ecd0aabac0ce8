//! Splitting a raw corpus string into named documents.
//!
//! Documents are introduced by a `--- Document: <name> ---` header line. Text
//! without any header is split on blank lines instead and every chunk gets a
//! synthetic `Document <n>` name.

use crate::{DocId, Document};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"---\sDocument:\s(.*)?\s---").expect("valid regex");
    static ref BLANK_LINE: Regex = Regex::new(r"\r?\n[ \t]*\r?\n").expect("valid regex");
}

/// Parse a corpus string. Returns an empty list when the input holds no text.
pub fn parse_documents(raw: &str) -> Vec<Document> {
    let mut synthetic = 0usize;
    let mut saw_header = false;
    let mut named: Vec<(String, String)> = Vec::new();

    for chunk in split_before_headers(raw).into_iter().map(str::trim).filter(|c| !c.is_empty()) {
        let header_name = HEADER
            .captures(chunk)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|name| !name.is_empty());
        match header_name {
            Some(name) => {
                saw_header = true;
                let content = HEADER.replace(chunk, "").trim().to_string();
                named.push((name, content));
            }
            None => {
                synthetic += 1;
                named.push((format!("Document {synthetic}"), chunk.to_string()));
            }
        }
    }

    if !saw_header {
        named = BLANK_LINE
            .split(raw)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .enumerate()
            .map(|(i, c)| (format!("Document {}", i + 1), c.to_string()))
            .collect();
    }

    named
        .into_iter()
        .enumerate()
        .map(|(i, (name, content))| Document { id: (i + 1) as DocId, name, content })
        .collect()
}

/// Render named texts in the header-delimited format accepted by [`parse_documents`].
pub fn format_corpus<'a, I>(docs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    docs.into_iter()
        .map(|(name, content)| {
            let name = name.replace(['\r', '\n'], " ");
            format!("--- Document: {} ---\n{}", name.trim(), content.trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split at every newline that is immediately followed by `---`.
fn split_before_headers(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, _) in text.match_indices('\n') {
        if text[i + 1..].starts_with("---") {
            chunks.push(&text[start..i]);
            start = i + 1;
        }
    }
    chunks.push(&text[start..]);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_name_documents() {
        let docs = parse_documents("--- Document: Alpha ---\nfirst body\n--- Document: Beta ---\nsecond body\n");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, 1);
        assert_eq!(docs[0].name, "Alpha");
        assert_eq!(docs[0].content, "first body");
        assert_eq!(docs[1].id, 2);
        assert_eq!(docs[1].name, "Beta");
        assert_eq!(docs[1].content, "second body");
    }

    #[test]
    fn text_before_first_header_gets_synthetic_name() {
        let docs = parse_documents("loose notes\n--- Document: Named ---\nbody");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "Document 1");
        assert_eq!(docs[0].content, "loose notes");
        assert_eq!(docs[1].name, "Named");
    }

    #[test]
    fn headerless_text_splits_on_blank_lines() {
        let docs = parse_documents("first paragraph\nstill first\n\nsecond paragraph\n  \n\nthird");
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Document 1", "Document 2", "Document 3"]);
        assert_eq!(docs[0].content, "first paragraph\nstill first");
        assert_eq!(docs[2].content, "third");
    }

    #[test]
    fn header_only_document_keeps_empty_body() {
        let docs = parse_documents("--- Document: Empty ---\n--- Document: Full ---\nwords");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "");
        assert_eq!(docs[1].content, "words");
    }

    #[test]
    fn blank_input_has_no_documents() {
        assert!(parse_documents("").is_empty());
        assert!(parse_documents("  \n\n \n").is_empty());
    }

    #[test]
    fn formatted_corpus_parses_back() {
        let corpus = format_corpus([("a.txt", "alpha text"), ("b\nc.txt", "beta text\n")]);
        let docs = parse_documents(&corpus);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "a.txt");
        assert_eq!(docs[1].name, "b c.txt");
        assert_eq!(docs[1].content, "beta text");
    }
}
