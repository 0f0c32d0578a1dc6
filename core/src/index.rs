use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::tokenizer::tokenize;

pub type Term = String;
/// Opaque document identifier; the file name for directory sources.
pub type DocumentId = String;
/// Term -> documents containing it. Enumeration order is unspecified.
pub type PostingSet = HashSet<DocumentId>;

/// Raw text keyed by document id. Content is immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: HashMap<DocumentId, String>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Later pairs with an already seen id replace the earlier content.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (DocumentId, String)>,
    {
        Self { docs: pairs.into_iter().collect() }
    }

    pub fn get(&self, doc_id: &str) -> Option<&str> { self.docs.get(doc_id).map(String::as_str) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &String)> {
        self.docs.iter()
    }

    /// Every loaded id; the base set for NOT queries.
    pub fn universe(&self) -> PostingSet { self.docs.keys().cloned().collect() }
}

/// Maps each term to the set of documents it occurs in.
///
/// Fully derived from a [`DocumentStore`]: a document is listed under a term
/// iff re-tokenizing its content yields that term at least once.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    postings: HashMap<Term, PostingSet>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Posting set for an already normalized term. Missing terms yield `None`
    /// and the index is never modified by a lookup.
    pub fn postings(&self, term: &str) -> Option<&PostingSet> { self.postings.get(term) }

    pub fn contains_term(&self, term: &str) -> bool { self.postings.contains_key(term) }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&Term, &PostingSet)> {
        self.postings.iter()
    }
}

/// Build the index for every document in the store.
pub fn build_index(store: &DocumentStore) -> InvertedIndex {
    let mut postings: HashMap<Term, PostingSet> = HashMap::new();
    for (doc_id, text) in store.iter() {
        for term in tokenize(text) {
            postings.entry(term).or_default().insert(doc_id.clone());
        }
    }
    InvertedIndex { postings }
}
