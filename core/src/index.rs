use crate::{DocId, TermId};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
    /// (1 + log10 tf) * log10 idf, zero until weights are computed
    pub weight: f64,
}

impl Posting {
    fn first(doc_id: DocId) -> Self {
        Self { doc_id, term_frequency: 1, weight: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub term: String,
    /// ordered by doc_id, unique per document
    pub postings: Vec<Posting>,
    /// N / df, zero until weights are computed
    pub idf: f64,
}

impl IndexEntry {
    pub fn document_frequency(&self) -> usize { self.postings.len() }
}

/// Folds a stream of (document, term) pairs into per-term postings.
///
/// Builders fed from disjoint document sets can be merged in any order and
/// grouping; [`IndexBuilder::finish`] orders postings by document id so the
/// frozen index does not depend on how the work was split.
#[derive(Debug, Default, Clone)]
pub struct IndexBuilder {
    postings: HashMap<String, Vec<Posting>>,
}

impl IndexBuilder {
    pub fn new() -> Self { Self::default() }

    /// Count one occurrence of `term` in `doc_id`. Empty terms are ignored.
    pub fn ingest(&mut self, doc_id: DocId, term: &str) {
        if term.is_empty() {
            return;
        }
        let plist = self.postings.entry(term.to_string()).or_default();
        // documents are usually fed in ascending order, so only the last posting is checked
        match plist.last().map(|p| p.doc_id.cmp(&doc_id)) {
            None | Some(Ordering::Less) => plist.push(Posting::first(doc_id)),
            Some(Ordering::Equal) => {
                if let Some(p) = plist.last_mut() {
                    p.term_frequency += 1;
                }
            }
            Some(Ordering::Greater) => match plist.iter_mut().find(|p| p.doc_id == doc_id) {
                Some(p) => p.term_frequency += 1,
                None => plist.push(Posting::first(doc_id)),
            },
        }
    }

    pub fn ingest_document<I, S>(&mut self, doc_id: DocId, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            self.ingest(doc_id, term.as_ref());
        }
    }

    /// Union of postings by term; frequencies of a shared (term, document) pair are summed.
    pub fn merge(mut self, other: IndexBuilder) -> IndexBuilder {
        if self.postings.len() < other.postings.len() {
            return other.merge(self);
        }
        for (term, theirs) in other.postings {
            let ours = self.postings.entry(term).or_default();
            *ours = merge_postings(std::mem::take(ours), theirs);
        }
        self
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Freeze the vocabulary: entries sorted by term, postings by document id.
    pub fn finish(self, num_docs: u32) -> InvertedIndex {
        let mut entries: Vec<IndexEntry> = self
            .postings
            .into_iter()
            .map(|(term, mut postings)| {
                postings.sort_by_key(|p| p.doc_id);
                IndexEntry { term, postings, idf: 0.0 }
            })
            .collect();
        entries.sort_by(|a, b| a.term.cmp(&b.term));
        let mut index = InvertedIndex { entries, lookup: HashMap::new(), num_docs, weighted: false };
        index.rebuild_lookup();
        index
    }
}

/// Two-pointer union of posting lists, ordered by document id.
///
/// Shards fold documents in ascending order, so the sorts are linear passes in practice.
fn merge_postings(mut ours: Vec<Posting>, mut theirs: Vec<Posting>) -> Vec<Posting> {
    ours.sort_by_key(|p| p.doc_id);
    theirs.sort_by_key(|p| p.doc_id);
    if ours.is_empty() {
        return theirs;
    }
    let mut merged = Vec::with_capacity(ours.len() + theirs.len());
    let mut a = ours.into_iter().peekable();
    let mut b = theirs.into_iter().peekable();
    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.doc_id.cmp(&y.doc_id),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match order {
            Ordering::Less => merged.extend(a.next()),
            Ordering::Greater => merged.extend(b.next()),
            Ordering::Equal => {
                if let (Some(mut x), Some(y)) = (a.next(), b.next()) {
                    x.term_frequency += y.term_frequency;
                    merged.push(x);
                }
            }
        }
    }
    merged
}

/// Sorted vocabulary with postings. A term's position is its [`TermId`].
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    entries: Vec<IndexEntry>,
    lookup: HashMap<String, TermId>,
    num_docs: u32,
    weighted: bool,
}

impl InvertedIndex {
    fn rebuild_lookup(&mut self) {
        self.lookup = self.entries.iter().enumerate().map(|(i, e)| (e.term.clone(), i)).collect();
    }

    pub fn num_docs(&self) -> u32 { self.num_docs }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn is_weighted(&self) -> bool { self.weighted }
    pub fn entries(&self) -> &[IndexEntry] { &self.entries }
    pub fn entry(&self, term_id: TermId) -> Option<&IndexEntry> { self.entries.get(term_id) }
    pub fn term_id(&self, term: &str) -> Option<TermId> { self.lookup.get(term).copied() }

    pub fn get(&self, term: &str) -> Option<&IndexEntry> {
        self.term_id(term).and_then(|id| self.entries.get(id))
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.term.as_str())
    }

    /// Stopword heuristic: drop short terms that occur in too many documents.
    ///
    /// A term is removed when `df >= ratio * N` and it has fewer than
    /// `min_protected_len` characters. Returns the number of removed terms.
    pub fn prune(&mut self, ratio: f64, min_protected_len: usize) -> usize {
        let threshold = ratio * self.num_docs as f64;
        let before = self.entries.len();
        self.entries.retain(|e| {
            (e.document_frequency() as f64) < threshold || e.term.chars().count() >= min_protected_len
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            self.rebuild_lookup();
        }
        removed
    }

    /// idf = N / df for every term, weight = (1 + log10 tf) * log10 idf for every posting.
    pub fn compute_weights(&mut self) {
        let n = self.num_docs as f64;
        for entry in self.entries.iter_mut() {
            entry.idf = n / entry.document_frequency() as f64;
            let log_idf = entry.idf.log10();
            for p in entry.postings.iter_mut() {
                p.weight = tf_idf_weight(p.term_frequency, log_idf);
            }
        }
        self.weighted = true;
    }
}

#[inline]
fn tf_idf_weight(tf: u32, log_idf: f64) -> f64 {
    (1.0 + (tf as f64).log10()) * log_idf
}
