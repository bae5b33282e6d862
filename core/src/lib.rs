pub mod champion;
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod index;
pub mod query;
pub mod rank;
pub mod tokenizer;
pub mod vectors;

/// 1-based document number.
pub type DocId = u32;
/// Position of a term in the sorted vocabulary, also its vector coordinate.
pub type TermId = usize;

pub use champion::ChampionLists;
pub use cluster::{CentroidMode, Cluster, ClusterPartition};
pub use config::EngineConfig;
pub use engine::{Engine, QueryResult, SearchIndex};
pub use index::{IndexBuilder, IndexEntry, InvertedIndex, Posting};
pub use tokenizer::{Normalizer, PersianNormalizer, WhitespaceNormalizer};
pub use vectors::DocumentVectors;
