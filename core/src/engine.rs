use crate::champion::ChampionLists;
use crate::cluster::{build_clusters, route, Cluster, ClusterPartition};
use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::index::{IndexBuilder, InvertedIndex};
use crate::query::{collect_candidates, vectorize};
use crate::rank::{rank_scored, ScoredDoc};
use crate::tokenizer::{tokenize, Normalizer};
use crate::vectors::DocumentVectors;
use crate::DocId;
use anyhow::{bail, Result};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// best first
    pub hits: Vec<ScoredDoc>,
    /// candidate documents taken from the champion lists
    pub candidates: usize,
    /// routed cluster, when clustering is on and the query matched the vocabulary
    pub cluster: Option<usize>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool { self.hits.is_empty() }
    pub fn doc_ids(&self) -> Vec<DocId> { self.hits.iter().map(|h| h.doc_id).collect() }
}

/// Read-only retrieval model: pruned weighted index, document vectors,
/// champion lists and optional cluster centroids. Nothing changes after `build`.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    index: InvertedIndex,
    vectors: DocumentVectors,
    champions: ChampionLists,
    clusters: Option<Vec<Cluster>>,
    top_k: usize,
}

impl SearchIndex {
    /// Run the batch pipeline over an ingested builder:
    /// freeze, prune, weight, materialize, champion lists, then centroids.
    pub fn build(
        builder: IndexBuilder,
        num_docs: u32,
        partition: Option<&ClusterPartition>,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let clusters_wanted = config.clustering;
        if clusters_wanted {
            match partition {
                None => bail!("clustering enabled but the corpus has no cluster partition"),
                Some(p) if p.num_docs() != num_docs => {
                    bail!("cluster partition covers {} documents, corpus has {}", p.num_docs(), num_docs)
                }
                Some(_) => {}
            }
        }

        let mut index = builder.finish(num_docs);
        let ingested = index.len();
        let pruned = index.prune(config.prune_ratio, config.min_protected_len);
        if config.weighting {
            index.compute_weights();
        }
        tracing::info!(num_docs, num_terms = index.len(), ingested, pruned, "index built");

        let vectors = DocumentVectors::materialize(&index);
        let champions = ChampionLists::build(&index, config.champion_size);
        tracing::info!(dims = vectors.dims(), champion_size = config.champion_size, "vectors and champion lists ready");

        let clusters = match partition {
            Some(p) if clusters_wanted => {
                let clusters = build_clusters(&vectors, p, config.centroid);
                tracing::info!(clusters = clusters.len(), centroid = ?config.centroid, "cluster centroids ready");
                Some(clusters)
            }
            _ => None,
        };

        Ok(Self { index, vectors, champions, clusters, top_k: config.top_k })
    }

    pub fn index(&self) -> &InvertedIndex { &self.index }
    pub fn vectors(&self) -> &DocumentVectors { &self.vectors }
    pub fn champions(&self) -> &ChampionLists { &self.champions }
    pub fn clusters(&self) -> Option<&[Cluster]> { self.clusters.as_deref() }
    pub fn top_k(&self) -> usize { self.top_k }

    /// Rank documents for already-normalized query terms.
    pub fn query_terms<S: AsRef<str>>(&self, terms: &[S]) -> QueryResult {
        let qv = vectorize(terms, &self.index);
        if qv.is_empty() {
            tracing::debug!(terms = terms.len(), "query matched no vocabulary term");
            return QueryResult::default();
        }

        let cluster = self.clusters.as_deref().and_then(|cs| route(cs, &qv.weights));
        let routed = cluster.and_then(|i| self.clusters.as_deref().and_then(|cs| cs.get(i)));
        let candidates = collect_candidates(&qv, &self.champions, routed);
        let hits = rank_scored(&candidates, &qv.weights, &self.vectors, self.top_k);
        tracing::debug!(matched = qv.matched.len(), ?cluster, candidates = candidates.len(), hits = hits.len(), "query ranked");
        QueryResult { hits, candidates: candidates.len(), cluster }
    }
}

/// Process-level handle: the built model plus the normalizer and document names.
pub struct Engine {
    index: SearchIndex,
    normalizer: Box<dyn Normalizer>,
    names: Vec<String>,
    clustered: bool,
}

impl Engine {
    /// Load the corpus at `root` (clustered layout when `config.clustering`) and build the model.
    pub fn open<P: AsRef<Path>>(root: P, config: &EngineConfig, normalizer: Box<dyn Normalizer>) -> Result<Self> {
        config.validate()?;
        let root = root.as_ref();
        let corpus = if config.clustering {
            let corpus = Corpus::clustered(root)?;
            if let Some(n) = config.num_docs {
                if n != corpus.num_docs() {
                    bail!("configured {n} documents but {} holds {}", root.display(), corpus.num_docs());
                }
            }
            corpus
        } else {
            Corpus::flat(root, config.num_docs)?
        };
        tracing::info!(root = %root.display(), num_docs = corpus.num_docs(), "corpus discovered");

        let builder = corpus.ingest(normalizer.as_ref())?;
        let index = SearchIndex::build(builder, corpus.num_docs(), corpus.partition(), config)?;
        let names = corpus.documents().iter().map(|d| d.name.clone()).collect();
        Ok(Self { index, normalizer, names, clustered: config.clustering })
    }

    pub fn from_index(index: SearchIndex, normalizer: Box<dyn Normalizer>) -> Self {
        Self { index, normalizer, names: Vec::new(), clustered: false }
    }

    pub fn search_index(&self) -> &SearchIndex { &self.index }

    pub fn query(&self, text: &str) -> QueryResult {
        let terms = tokenize(text, self.normalizer.as_ref());
        self.index.query_terms(terms.as_slice())
    }

    /// File stem for clustered corpora, the document number otherwise.
    pub fn display_name(&self, doc_id: DocId) -> String {
        if self.clustered {
            if let Some(name) = (doc_id as usize).checked_sub(1).and_then(|i| self.names.get(i)) {
                return name.clone();
            }
        }
        doc_id.to_string()
    }

    pub fn shutdown(self) {
        tracing::info!("engine shut down");
    }
}
