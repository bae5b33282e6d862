use crate::vectors::{cosine_similarity, DocumentVectors};
use crate::DocId;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A candidate with nonzero similarity. Ordered by similarity, then document id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub similarity: f64,
    pub doc_id: DocId,
}

impl Eq for ScoredDoc {}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        self.similarity
            .total_cmp(&other.similarity)
            .then(self.doc_id.cmp(&other.doc_id))
    }
}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// Restore the max-heap property for the subtree at `root`, looking at `arr[..n]` only.
fn sift_down<T: Ord>(arr: &mut [T], n: usize, mut root: usize) {
    loop {
        let mut largest = root;
        let left = 2 * root + 1;
        let right = left + 1;
        if left < n && arr[largest] < arr[left] {
            largest = left;
        }
        if right < n && arr[largest] < arr[right] {
            largest = right;
        }
        if largest == root {
            return;
        }
        arr.swap(root, largest);
        root = largest;
    }
}

/// In-place ascending heap sort: build a max-heap, then move the root to the back.
pub fn heap_sort<T: Ord>(arr: &mut [T]) {
    let n = arr.len();
    for i in (0..n / 2).rev() {
        sift_down(arr, n, i);
    }
    for end in (1..n).rev() {
        arr.swap(0, end);
        sift_down(arr, end, 0);
    }
}

/// Score candidates against the query; keep the nonzero ones, one per document.
///
/// Duplicate candidate ids are skipped, not re-scored. Output keeps candidate order.
pub fn score_candidates(candidates: &[DocId], query: &[f64], vectors: &DocumentVectors) -> Vec<ScoredDoc> {
    let mut seen = HashSet::with_capacity(candidates.len());
    let unique: Vec<DocId> = candidates.iter().copied().filter(|d| seen.insert(*d)).collect();
    unique
        .par_iter()
        .filter_map(|&doc_id| {
            let row = vectors.get(doc_id)?;
            let similarity = cosine_similarity(row, query);
            (similarity != 0.0).then_some(ScoredDoc { similarity, doc_id })
        })
        .collect()
}

/// Top-k document ids by descending similarity.
pub fn rank(candidates: &[DocId], query: &[f64], vectors: &DocumentVectors, k: usize) -> Vec<DocId> {
    rank_scored(candidates, query, vectors, k).into_iter().map(|s| s.doc_id).collect()
}

pub fn rank_scored(candidates: &[DocId], query: &[f64], vectors: &DocumentVectors, k: usize) -> Vec<ScoredDoc> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }
    top_k(score_candidates(candidates, query, vectors), k)
}

/// The `k` greatest items, greatest first. Nothing is sorted when there is nothing to keep.
pub fn top_k<T: Ord>(mut items: Vec<T>, k: usize) -> Vec<T> {
    if items.is_empty() || k == 0 {
        return Vec::new();
    }
    heap_sort(&mut items);
    let start = items.len().saturating_sub(k);
    items.drain(..start);
    items.reverse();
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn heap_sort_sorts_ascending() {
        let mut v = vec![5, 1, 4, 1, 9, 2, 6, 5, 3];
        heap_sort(&mut v);
        assert_eq!(v, vec![1, 1, 2, 3, 4, 5, 5, 6, 9]);
        let mut empty: Vec<i32> = vec![];
        heap_sort(&mut empty);
        let mut one = vec![7];
        heap_sort(&mut one);
        assert_eq!(one, vec![7]);
    }

    fn vectors() -> DocumentVectors {
        DocumentVectors::from_rows(vec![
            vec![1.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.2, 0.0],
            vec![1.0, 1.0, 0.0],
        ])
    }

    #[test]
    fn top_k_descending_without_zero_scores() {
        let q = [1.0, 0.0, 0.0];
        let ids = rank(&[2, 3, 1, 4], &q, &vectors(), 5);
        assert_eq!(ids, vec![1, 4, 2]);
        let ids = rank(&[2, 3, 1, 4], &q, &vectors(), 2);
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn duplicates_are_scored_once() {
        let q = [1.0, 0.0, 0.0];
        let scored = rank_scored(&[4, 4, 1, 4], &q, &vectors(), 10);
        assert_eq!(scored.iter().map(|s| s.doc_id).collect::<Vec<_>>(), vec![1, 4]);
        assert!(scored[0].similarity >= scored[1].similarity);
    }

    #[test]
    fn equal_scores_list_higher_id_first() {
        let q = [1.0, 1.0, 0.0];
        assert_eq!(rank(&[2, 5], &q, &vectors(), 2), vec![5, 2]);
    }

    #[test]
    fn empty_or_unknown_candidates() {
        let q = [1.0, 0.0, 0.0];
        assert!(rank(&[], &q, &vectors(), 3).is_empty());
        assert!(rank(&[3, 42], &q, &vectors(), 3).is_empty());
        assert!(rank_scored(&[], &q, &vectors(), 5).is_empty());
        assert!(rank_scored(&[1, 2], &q, &vectors(), 0).is_empty());
    }

    thread_local! {
        static COMPARISONS: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Counted(u32);

    impl PartialOrd for Counted {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
    }

    impl Ord for Counted {
        fn cmp(&self, other: &Self) -> Ordering {
            COMPARISONS.with(|c| c.set(c.get() + 1));
            self.0.cmp(&other.0)
        }
    }

    #[test]
    fn top_k_skips_sorting_when_nothing_is_kept() {
        COMPARISONS.with(|c| c.set(0));
        assert!(top_k(Vec::<Counted>::new(), 5).is_empty());
        assert!(top_k(vec![Counted(3), Counted(1), Counted(2)], 0).is_empty());
        assert_eq!(COMPARISONS.with(Cell::get), 0);

        let kept = top_k(vec![Counted(3), Counted(1), Counted(2)], 2);
        assert_eq!(kept, vec![Counted(3), Counted(2)]);
        assert!(COMPARISONS.with(Cell::get) > 0);
    }
}
