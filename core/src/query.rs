use crate::champion::ChampionLists;
use crate::cluster::Cluster;
use crate::index::InvertedIndex;
use crate::{DocId, TermId};
use std::collections::HashSet;

/// Dense query vector holding the raw idf of each matched term.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    pub weights: Vec<f64>,
    /// vocabulary hits in query order, without repeats
    pub matched: Vec<TermId>,
}

impl QueryVector {
    pub fn is_empty(&self) -> bool { self.matched.is_empty() }
}

/// Map normalized query terms onto the vocabulary. Unknown terms are ignored.
pub fn vectorize<S: AsRef<str>>(terms: &[S], index: &InvertedIndex) -> QueryVector {
    let mut weights = vec![0.0; index.len()];
    let mut matched = Vec::new();
    for term in terms {
        let Some(id) = index.term_id(term.as_ref()) else { continue };
        if let Some(entry) = index.entry(id) {
            weights[id] = entry.idf;
        }
        if !matched.contains(&id) {
            matched.push(id);
        }
    }
    QueryVector { weights, matched }
}

/// Union of the matched terms' champion lists, first occurrence kept.
/// With a routed cluster only its members survive.
pub fn collect_candidates(query: &QueryVector, champions: &ChampionLists, cluster: Option<&Cluster>) -> Vec<DocId> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for &term_id in &query.matched {
        for &doc_id in champions.get(term_id) {
            if cluster.map_or(true, |c| c.contains(doc_id)) && seen.insert(doc_id) {
                candidates.push(doc_id);
            }
        }
    }
    candidates
}
