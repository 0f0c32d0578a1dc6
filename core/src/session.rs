//! One loaded collection and its index, mutated only through `load` and `reset`.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::Result;
use crate::index::{build_index, DocumentStore, InvertedIndex, PostingSet};
use crate::query::{evaluate_terms, Operator};
use crate::source::DocumentSource;
use crate::tokenizer::tokenize;

/// Result of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// The source was reachable but held no documents.
    EmptyCollection,
}

/// Result of a query, split so front ends can word each case differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query had no terms once stopwords and punctuation were dropped.
    EmptyQuery,
    NoMatch,
    Matches(PostingSet),
}

impl SearchOutcome {
    pub fn into_set(self) -> PostingSet {
        match self {
            SearchOutcome::Matches(set) => set,
            SearchOutcome::EmptyQuery | SearchOutcome::NoMatch => PostingSet::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    store: DocumentStore,
    index: InvertedIndex,
}

impl SearchSession {
    pub fn new() -> Self { Self::default() }

    /// Replace the current collection with `source`. On error nothing changes.
    pub fn load(&mut self, source: &dyn DocumentSource) -> Result<LoadOutcome> {
        let (store, index) = materialize(source)?;
        Ok(self.install(store, index))
    }

    /// Drop all documents and terms. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.store = DocumentStore::new();
        self.index = InvertedIndex::new();
        tracing::info!("session reset");
    }

    fn install(&mut self, store: DocumentStore, index: InvertedIndex) -> LoadOutcome {
        tracing::info!(num_docs = store.len(), num_terms = index.num_terms(), "collection loaded");
        let n = store.len();
        self.store = store;
        self.index = index;
        if n == 0 { LoadOutcome::EmptyCollection } else { LoadOutcome::Loaded(n) }
    }

    pub fn evaluate(&self, query: &str, op: Operator) -> PostingSet {
        self.search(query, op).into_set()
    }

    pub fn search(&self, query: &str, op: Operator) -> SearchOutcome {
        let terms = tokenize(query);
        if terms.is_empty() {
            tracing::debug!(%op, "query has no terms");
            return SearchOutcome::EmptyQuery;
        }
        let universe = match op {
            Operator::Not => self.store.universe(),
            Operator::And | Operator::Or => PostingSet::new(),
        };
        let hits = evaluate_terms(&terms, op, &self.index, &universe);
        tracing::debug!(%op, terms = terms.len(), hits = hits.len(), "query evaluated");
        if hits.is_empty() { SearchOutcome::NoMatch } else { SearchOutcome::Matches(hits) }
    }

    /// Read-only view of the current index.
    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn document(&self, doc_id: &str) -> Option<&str> { self.store.get(doc_id) }

    pub fn universe(&self) -> PostingSet { self.store.universe() }

    pub fn len(&self) -> usize { self.store.len() }

    pub fn is_empty(&self) -> bool { self.store.is_empty() }
}

fn materialize(source: &dyn DocumentSource) -> Result<(DocumentStore, InvertedIndex)> {
    let store = DocumentStore::from_pairs(source.documents()?);
    let index = build_index(&store);
    Ok((store, index))
}

/// A [`SearchSession`] shared between threads.
///
/// Loads build the replacement collection before taking the write lock, so
/// readers see either the old index or the new one, never a partial build.
#[derive(Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<SearchSession>>,
}

impl SharedSession {
    pub fn new() -> Self { Self::default() }

    pub fn load(&self, source: &dyn DocumentSource) -> Result<LoadOutcome> {
        let (store, index) = materialize(source)?;
        Ok(self.inner.write().install(store, index))
    }

    pub fn reset(&self) { self.inner.write().reset(); }

    /// Run `f` under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&SearchSession) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    pub fn search(&self, query: &str, op: Operator) -> SearchOutcome { self.read(|s| s.search(query, op)) }

    pub fn len(&self) -> usize { self.read(|s| s.len()) }

    pub fn is_empty(&self) -> bool { self.read(|s| s.is_empty()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::source::MemorySource;

    struct Broken;

    impl DocumentSource for Broken {
        fn documents(&self) -> Result<Vec<(String, String)>> {
            Err(SearchError::SourceUnavailable { source_name: "broken".into(), reason: "offline".into() })
        }
    }

    fn animals() -> MemorySource {
        MemorySource::new([("d1", "the cat sat"), ("d2", "the dog sat"), ("d3", "cat and dog")])
    }

    #[test]
    fn failed_load_keeps_previous_collection() {
        let mut s = SearchSession::new();
        assert_eq!(s.load(&animals()).unwrap(), LoadOutcome::Loaded(3));
        assert!(s.load(&Broken).is_err());
        assert_eq!(s.len(), 3);
        assert!(s.index().contains_term("cat"));
    }

    #[test]
    fn empty_source_is_distinguished() {
        let mut s = SearchSession::new();
        let empty: MemorySource = MemorySource::new(Vec::<(String, String)>::new());
        assert_eq!(s.load(&empty).unwrap(), LoadOutcome::EmptyCollection);
        assert!(s.is_empty());
        assert!(s.index().is_empty());
        assert_eq!(s.search("cat", Operator::Not), SearchOutcome::NoMatch);
    }

    #[test]
    fn outcomes_are_classified() {
        let mut s = SearchSession::new();
        s.load(&animals()).unwrap();
        assert_eq!(s.search("the of !!", Operator::Or), SearchOutcome::EmptyQuery);
        assert_eq!(s.search("zebra", Operator::Or), SearchOutcome::NoMatch);
        match s.search("cat sat", Operator::And) {
            SearchOutcome::Matches(set) => assert_eq!(set, PostingSet::from(["d1".to_string()])),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut s = SearchSession::new();
        s.load(&animals()).unwrap();
        s.reset();
        s.reset();
        assert!(s.is_empty());
        assert!(s.index().is_empty());
        assert!(s.document("d1").is_none());
    }

    #[test]
    fn shared_session_swaps_whole_collection() {
        let shared = SharedSession::new();
        shared.load(&animals()).unwrap();
        shared.load(&MemorySource::new([("x", "zebra")])).unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared.search("cat", Operator::Or), SearchOutcome::NoMatch);
        let hits = shared.search("zebra", Operator::And).into_set();
        assert!(hits.contains("x"));
    }
}
