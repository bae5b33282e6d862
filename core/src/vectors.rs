use crate::index::InvertedIndex;
use crate::DocId;

/// Dense tf-idf weight vector per document, one coordinate per vocabulary term.
#[derive(Debug, Clone, Default)]
pub struct DocumentVectors {
    dims: usize,
    // row d - 1 belongs to document d
    rows: Vec<Vec<f64>>,
}

impl DocumentVectors {
    /// Expand postings into `index.num_docs()` dense rows.
    ///
    /// Must run on a pruned, weighted index: coordinates follow the frozen vocabulary order.
    pub fn materialize(index: &InvertedIndex) -> Self {
        let dims = index.len();
        let mut rows = vec![vec![0.0; dims]; index.num_docs() as usize];
        for (term_id, entry) in index.entries().iter().enumerate() {
            for p in &entry.postings {
                if let Some(row) = (p.doc_id as usize).checked_sub(1).and_then(|i| rows.get_mut(i)) {
                    row[term_id] = p.weight;
                }
            }
        }
        Self { dims, rows }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let dims = rows.first().map_or(0, Vec::len);
        Self { dims, rows }
    }

    pub fn dims(&self) -> usize { self.dims }
    pub fn num_docs(&self) -> usize { self.rows.len() }

    pub fn get(&self, doc_id: DocId) -> Option<&[f64]> {
        (doc_id as usize).checked_sub(1).and_then(|i| self.rows.get(i)).map(Vec::as_slice)
    }
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// cos(a, b) = a.b / (|a| |b|), and 0 whenever a.b is 0.
///
/// The zero-dot short circuit also covers zero vectors, so there is no division by zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let numerator = dot(a, b);
    if numerator == 0.0 {
        return 0.0;
    }
    let norm_a = dot(a, a).sqrt();
    let norm_b = dot(b, b).sqrt();
    numerator / (norm_a * norm_b)
}
