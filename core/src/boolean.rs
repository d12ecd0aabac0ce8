//! Boolean retrieval: a recursive-descent parser for `AND` / `OR` / `NOT`
//! queries and a set-based evaluator over literal document terms.
//!
//! Grammar, after whitespace runs are collapsed to single spaces:
//!
//! ```text
//! expression := term ( (" AND " | " OR " | " NOT ") term )*
//! term       := "NOT " term | "(" expression ")" | WORD
//! ```
//!
//! Binary operators fold left with no precedence between them. A binary `NOT`
//! reads as and-not: `a NOT b` is `a AND (NOT b)`.
//!
//! Queries are bounded: at most [`MAX_NESTING`] open groups and unary `NOT`s
//! at once, and at most [`MAX_OPERATORS`] binary operators, so parsing,
//! evaluation and dropping the tree all stay within a small stack.

use crate::error::{BooleanParseError, Result};
use crate::tokenizer::tokenize_raw;
use crate::{Document, DocumentRef};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Deepest allowed stack of `(` groups and unary `NOT`s.
pub const MAX_NESTING: usize = 256;
/// Most binary operators a single query may hold.
pub const MAX_OPERATORS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Term(String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Term(t) => write!(f, "{t}"),
            Expr::And(l, r) => write!(f, "AND({l}, {r})"),
            Expr::Or(l, r) => write!(f, "OR({l}, {r})"),
            Expr::Not(e) => write!(f, "NOT({e})"),
        }
    }
}

pub fn parse_query(query: &str) -> std::result::Result<Expr, BooleanParseError> {
    let normalized = query.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut parser = Parser { input: &normalized, pos: 0, depth: 0, operators: 0 };
    let expr = parser.parse_expression()?;
    let rest = parser.rest();
    if rest.starts_with(')') {
        return Err(BooleanParseError::UnmatchedParenthesis { position: parser.pos, fragment: rest.to_string() });
    }
    if !rest.is_empty() {
        return Err(BooleanParseError::TrailingInput { fragment: rest.to_string() });
    }
    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
    /// Open groups and unary `NOT`s around the cursor.
    depth: usize,
    operators: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str { &self.input[self.pos..] }

    fn fragment_at(&self, position: usize) -> String { self.input[position..].to_string() }

    fn enter(&mut self) -> std::result::Result<(), BooleanParseError> {
        if self.depth >= MAX_NESTING {
            return Err(BooleanParseError::NestingTooDeep {
                limit: MAX_NESTING,
                position: self.pos,
                fragment: self.fragment_at(self.pos),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn count_operator(&mut self) -> std::result::Result<(), BooleanParseError> {
        if self.operators >= MAX_OPERATORS {
            return Err(BooleanParseError::TooManyOperators { limit: MAX_OPERATORS, position: self.pos });
        }
        self.operators += 1;
        Ok(())
    }

    fn parse_expression(&mut self) -> std::result::Result<Expr, BooleanParseError> {
        let mut left = self.parse_term()?;
        loop {
            let rest = self.rest();
            if rest.starts_with(" AND ") || rest.starts_with(" OR ") || rest.starts_with(" NOT ") {
                self.count_operator()?;
            }
            if rest.starts_with(" AND ") {
                self.pos += 5;
                let right = self.parse_term()?;
                left = Expr::And(Box::new(left), Box::new(right));
            } else if rest.starts_with(" OR ") {
                self.pos += 4;
                let right = self.parse_term()?;
                left = Expr::Or(Box::new(left), Box::new(right));
            } else if rest.starts_with(" NOT ") {
                // leave "NOT " for parse_term so the right side is negated
                self.pos += 1;
                let right = self.parse_term()?;
                left = Expr::And(Box::new(left), Box::new(right));
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> std::result::Result<Expr, BooleanParseError> {
        if self.rest().starts_with("NOT ") {
            self.enter()?;
            self.pos += 4;
            let inner = self.parse_term()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        if self.rest().starts_with('(') {
            self.enter()?;
            let open = self.pos;
            self.pos += 1;
            let expr = self.parse_expression()?;
            if self.rest().starts_with(')') {
                self.pos += 1;
                self.depth -= 1;
                return Ok(expr);
            }
            return Err(BooleanParseError::UnmatchedParenthesis { position: open, fragment: self.fragment_at(open) });
        }
        let start = self.pos;
        let rest = self.rest();
        let len = rest.find([' ', ')']).unwrap_or(rest.len());
        // an operator keyword where a term belongs counts as a missing term
        if len == 0 || matches!(&rest[..len], "AND" | "OR" | "NOT") {
            return Err(BooleanParseError::EmptyTerm { position: start, fragment: rest.to_string() });
        }
        self.pos += len;
        Ok(Expr::Term(rest[..len].to_string()))
    }
}

/// Per-document sets of literal lowercase terms.
pub struct BooleanIndex {
    doc_terms: Vec<HashSet<String>>,
}

impl BooleanIndex {
    pub fn new(documents: &[Document]) -> Self {
        let doc_terms = documents.iter().map(|d| tokenize_raw(&d.content).into_iter().collect()).collect();
        Self { doc_terms }
    }

    /// Indices (0-based, corpus order) of the documents satisfying `expr`.
    pub fn evaluate(&self, expr: &Expr) -> BTreeSet<usize> {
        match expr {
            Expr::Term(word) => {
                let word = word.to_lowercase();
                self.doc_terms
                    .iter()
                    .enumerate()
                    .filter(|(_, terms)| terms.contains(&word))
                    .map(|(i, _)| i)
                    .collect()
            }
            Expr::And(l, r) => {
                let left = self.evaluate(l);
                let right = self.evaluate(r);
                left.intersection(&right).copied().collect()
            }
            Expr::Or(l, r) => {
                let mut left = self.evaluate(l);
                left.extend(self.evaluate(r));
                left
            }
            Expr::Not(e) => {
                let inner = self.evaluate(e);
                (0..self.doc_terms.len()).filter(|i| !inner.contains(i)).collect()
            }
        }
    }
}

/// Parse `query` and return the matching documents in corpus order.
pub fn search_boolean(query: &str, documents: &[Document]) -> Result<Vec<DocumentRef>> {
    let expr = parse_query(query)?;
    tracing::debug!(%expr, "boolean query parsed");
    let hits = BooleanIndex::new(documents).evaluate(&expr);
    Ok(hits.into_iter().map(|i| documents[i].to_ref()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_documents;

    fn parsed(q: &str) -> String {
        parse_query(q).unwrap().to_string()
    }

    #[test]
    fn operators_fold_left_without_precedence() {
        assert_eq!(parsed("a OR b AND c"), "AND(OR(a, b), c)");
        assert_eq!(parsed("a AND b OR c"), "OR(AND(a, b), c)");
        assert_eq!(parsed("a OR (b AND c)"), "OR(a, AND(b, c))");
    }

    #[test]
    fn binary_not_is_and_not() {
        assert_eq!(parsed("apple NOT banana"), "AND(apple, NOT(banana))");
        assert_eq!(parsed("NOT NOT apple"), "NOT(NOT(apple))");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(parsed("  apple   AND\tbanana "), "AND(apple, banana)");
    }

    #[test]
    fn parse_errors() {
        let unmatched = |position: usize, fragment: &str| {
            Err(BooleanParseError::UnmatchedParenthesis { position, fragment: fragment.into() })
        };
        let missing = |position: usize, fragment: &str| Err(BooleanParseError::EmptyTerm { position, fragment: fragment.into() });
        assert_eq!(parse_query("(apple AND banana"), unmatched(0, "(apple AND banana"));
        assert_eq!(parse_query("apple)"), unmatched(5, ")"));
        assert_eq!(parse_query("apple AND AND banana"), missing(10, "AND banana"));
        assert_eq!(parse_query("apple AND )"), missing(10, ")"));
        assert_eq!(parse_query("()"), missing(1, ")"));
        assert_eq!(parse_query(""), missing(0, ""));
        assert_eq!(
            parse_query("apple and banana"),
            Err(BooleanParseError::TrailingInput { fragment: " and banana".into() })
        );
    }

    #[test]
    fn error_messages_quote_the_fragment() {
        let err = parse_query("apple AND AND banana").unwrap_err();
        assert_eq!(err.to_string(), "missing query term at position 10: \"AND banana\"");
    }

    #[test]
    fn deeply_nested_parentheses() {
        let depth = 200;
        let q = format!("{}apple{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_query(&q), Ok(Expr::Term("apple".into())));
        let unbalanced = format!("{}apple{}", "(".repeat(depth), ")".repeat(depth - 1));
        assert!(matches!(parse_query(&unbalanced), Err(BooleanParseError::UnmatchedParenthesis { .. })));
    }

    #[test]
    fn nesting_is_capped() {
        let at_limit = format!("{}apple{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse_query(&at_limit).is_ok());

        let over = format!("{}apple{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        match parse_query(&over) {
            Err(BooleanParseError::NestingTooDeep { limit, position, .. }) => {
                assert_eq!(limit, MAX_NESTING);
                assert_eq!(position, MAX_NESTING);
            }
            other => panic!("unexpected {other:?}"),
        }

        let nots = format!("{}apple", "NOT ".repeat(MAX_NESTING + 1));
        assert!(matches!(parse_query(&nots), Err(BooleanParseError::NestingTooDeep { .. })));
        // siblings do not accumulate depth
        let siblings = vec!["(NOT apple)"; MAX_NESTING + 10].join(" OR ");
        assert!(parse_query(&siblings).is_ok());
    }

    #[test]
    fn operator_count_is_capped() {
        let at_limit = vec!["apple"; MAX_OPERATORS + 1].join(" AND ");
        assert!(parse_query(&at_limit).is_ok());
        let over = vec!["apple"; MAX_OPERATORS + 2].join(" OR ");
        assert!(matches!(
            parse_query(&over),
            Err(BooleanParseError::TooManyOperators { limit: MAX_OPERATORS, .. })
        ));
    }

    #[test]
    fn terms_match_literal_words_case_insensitively() {
        let docs = parse_documents(
            "--- Document: A ---\nApple pie and cream\n--- Document: B ---\nbanana bread\n--- Document: C ---\napples and bananas",
        );
        let hits = search_boolean("APPLE OR banana", &docs).unwrap();
        let ids: Vec<u32> = hits.iter().map(|d| d.doc_id).collect();
        assert_eq!(ids, vec![1, 2]);
        // stopwords are searchable
        let hits = search_boolean("and", &docs).unwrap();
        assert_eq!(hits.len(), 2);
    }
}
