use crate::vectors::{cosine_similarity, DocumentVectors};
use crate::DocId;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How a cluster's members are folded into its centroid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentroidMode {
    /// Start from the first member, then `c[k] = (c[k] + m[k]) / 2` for each later member.
    /// Order dependent: later members weigh more.
    #[default]
    Pairwise,
    /// Arithmetic mean of all members.
    Mean,
}

/// Static split of the document ids 1..=N into contiguous, ordered, non-empty ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterPartition {
    ranges: Vec<Range<DocId>>,
}

impl ClusterPartition {
    /// Consecutive clusters of the given sizes, the first starting at document 1.
    pub fn from_sizes(sizes: &[usize]) -> Result<Self> {
        let mut ranges = Vec::with_capacity(sizes.len());
        let mut start: DocId = 1;
        for (i, &size) in sizes.iter().enumerate() {
            if size == 0 {
                bail!("cluster {i} has no documents");
            }
            let end = start + size as DocId;
            ranges.push(start..end);
            start = end;
        }
        Ok(Self { ranges })
    }

    pub fn len(&self) -> usize { self.ranges.len() }
    pub fn is_empty(&self) -> bool { self.ranges.is_empty() }
    pub fn num_docs(&self) -> u32 { self.ranges.last().map_or(0, |r| r.end - 1) }
    pub fn range(&self, cluster: usize) -> Option<Range<DocId>> { self.ranges.get(cluster).cloned() }

    pub fn cluster_of(&self, doc_id: DocId) -> Option<usize> {
        self.ranges.iter().position(|r| r.contains(&doc_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: usize,
    pub centroid: Vec<f64>,
    pub members: Range<DocId>,
}

impl Cluster {
    pub fn contains(&self, doc_id: DocId) -> bool { self.members.contains(&doc_id) }
}

/// Centroids for every partition, in partition order.
pub fn build_clusters(vectors: &DocumentVectors, partition: &ClusterPartition, mode: CentroidMode) -> Vec<Cluster> {
    partition
        .ranges
        .iter()
        .enumerate()
        .map(|(id, members)| Cluster { id, centroid: centroid(vectors, members.clone(), mode), members: members.clone() })
        .collect()
}

fn centroid(vectors: &DocumentVectors, members: Range<DocId>, mode: CentroidMode) -> Vec<f64> {
    let mut rows = members.filter_map(|d| vectors.get(d));
    let mut c = match rows.next() {
        Some(first) => first.to_vec(),
        None => return vec![0.0; vectors.dims()],
    };
    match mode {
        CentroidMode::Pairwise => {
            for row in rows {
                for (ck, mk) in c.iter_mut().zip(row) {
                    *ck = (*ck + mk) / 2.0;
                }
            }
        }
        CentroidMode::Mean => {
            let mut count = 1usize;
            for row in rows {
                for (ck, mk) in c.iter_mut().zip(row) {
                    *ck += mk;
                }
                count += 1;
            }
            let n = count as f64;
            c.iter_mut().for_each(|ck| *ck /= n);
        }
    }
    c
}

/// Index of the centroid most similar to `query`; ties go to the lowest index.
pub fn route(clusters: &[Cluster], query: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, cluster) in clusters.iter().enumerate() {
        let s = cosine_similarity(&cluster.centroid, query);
        match best {
            Some((_, top)) if s <= top => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}
