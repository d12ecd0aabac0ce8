use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BooleanParseError {
    #[error("unmatched parenthesis at position {position}: {fragment:?}")]
    UnmatchedParenthesis { position: usize, fragment: String },

    #[error("missing query term at position {position}: {fragment:?}")]
    EmptyTerm { position: usize, fragment: String },

    #[error("query nests deeper than {limit} levels at position {position}: {fragment:?}")]
    NestingTooDeep { limit: usize, position: usize, fragment: String },

    #[error("query has more than {limit} operators (position {position})")]
    TooManyOperators { limit: usize, position: usize },

    #[error("unexpected input at end of query: {fragment:?}")]
    TrailingInput { fragment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("please provide at least one document")]
    EmptyCorpus,

    #[error("invalid regular expression: {0}")]
    InvalidPattern(String),

    #[error("failed to parse boolean query: {0}")]
    BooleanParse(#[from] BooleanParseError),

    #[error("cluster count must be a positive integer, got {0:?}")]
    InvalidClusterCount(String),

    #[error("cluster count {k} exceeds the number of documents ({documents})")]
    TooFewDocuments { k: usize, documents: usize },

    #[error("unrecognized method: {0:?}")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
