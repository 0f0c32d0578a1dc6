use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;
use crate::index::{InvertedIndex, PostingSet};
use crate::tokenizer::tokenize;

/// Set operation applied uniformly across every term of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Documents containing every term.
    #[default]
    And,
    /// Documents containing at least one term.
    Or,
    /// Documents containing none of the terms.
    Not,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Operator::And, Operator::Or, Operator::Not];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Operator {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Operator::And),
            "OR" => Ok(Operator::Or),
            "NOT" => Ok(Operator::Not),
            _ => Err(SearchError::InvalidOperator(s.to_string())),
        }
    }
}

/// Evaluate `query` against `index`. `universe` is the base set for NOT.
///
/// A query with no terms after tokenization matches nothing under every
/// operator. Terms absent from the index behave as empty posting sets.
pub fn evaluate(query: &str, op: Operator, index: &InvertedIndex, universe: &PostingSet) -> PostingSet {
    let terms = tokenize(query);
    evaluate_terms(&terms, op, index, universe)
}

/// Same as [`evaluate`] for already tokenized terms.
pub fn evaluate_terms(terms: &[String], op: Operator, index: &InvertedIndex, universe: &PostingSet) -> PostingSet {
    let Some((first, rest)) = terms.split_first() else {
        return PostingSet::new();
    };
    match op {
        Operator::And => {
            let mut result = index.postings(first).cloned().unwrap_or_default();
            for term in rest {
                if result.is_empty() { break; }
                match index.postings(term) {
                    Some(p) => result.retain(|d| p.contains(d)),
                    None => result.clear(),
                }
            }
            result
        }
        Operator::Or => {
            let mut result = PostingSet::new();
            for term in terms {
                if let Some(p) = index.postings(term) {
                    result.extend(p.iter().cloned());
                }
            }
            result
        }
        Operator::Not => {
            let mut result = universe.clone();
            for term in terms {
                if let Some(p) = index.postings(term) {
                    result.retain(|d| !p.contains(d));
                }
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operators_case_insensitively() {
        assert_eq!("and".parse::<Operator>().unwrap(), Operator::And);
        assert_eq!(" Or ".parse::<Operator>().unwrap(), Operator::Or);
        assert_eq!("NOT".parse::<Operator>().unwrap(), Operator::Not);
    }

    #[test]
    fn rejects_unknown_operator() {
        let err = "XOR".parse::<Operator>().unwrap_err();
        assert_eq!(err, SearchError::InvalidOperator("XOR".into()));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for op in Operator::ALL {
            assert_eq!(op.to_string().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn default_is_and() {
        assert_eq!(Operator::default(), Operator::And);
    }
}
