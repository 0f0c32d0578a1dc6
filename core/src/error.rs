/// Failures surfaced by the engine. Missing terms, empty queries and empty
/// collections are ordinary data states and never show up here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The document source could not be enumerated at all.
    #[error("document source {source_name} unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },
    /// Operator outside AND/OR/NOT.
    #[error("invalid search operator: {0:?}")]
    InvalidOperator(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
