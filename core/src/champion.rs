use crate::index::InvertedIndex;
use crate::{DocId, TermId};

/// Per-term shortlist of the highest-weight documents, indexed by [`TermId`].
#[derive(Debug, Clone, Default)]
pub struct ChampionLists {
    lists: Vec<Vec<DocId>>,
}

impl ChampionLists {
    /// Keep, for every term, the `r` postings with the highest weight, best first.
    ///
    /// The sort is stable on weight alone, so equal weights keep posting (document id) order.
    pub fn build(index: &InvertedIndex, r: usize) -> Self {
        let lists: Vec<Vec<DocId>> = index
            .entries()
            .iter()
            .map(|entry| {
                let mut ranked: Vec<_> = entry.postings.iter().collect();
                ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
                ranked.into_iter().take(r).map(|p| p.doc_id).collect()
            })
            .collect();
        Self { lists }
    }

    pub fn get(&self, term_id: TermId) -> &[DocId] {
        self.lists.get(term_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize { self.lists.len() }
    pub fn is_empty(&self) -> bool { self.lists.is_empty() }
}
