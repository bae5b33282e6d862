use vsm_core::{DocId, EngineConfig, IndexBuilder, SearchIndex};

fn builder(docs: &[&str]) -> IndexBuilder {
    let mut b = IndexBuilder::new();
    for (i, d) in docs.iter().enumerate() {
        b.ingest_document(i as DocId + 1, d.split_whitespace());
    }
    b
}

fn build(docs: &[&str], config: &EngineConfig) -> SearchIndex {
    SearchIndex::build(builder(docs), docs.len() as u32, None, config).unwrap()
}

#[test]
fn three_document_weights_follow_formula() {
    let idx = build(&["a b a", "b c", "a c c"], &EngineConfig::default());
    let index = idx.index();
    assert_eq!(index.vocabulary().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    for entry in index.entries() {
        assert_eq!(entry.document_frequency(), 2);
        assert_eq!(entry.idf, 1.5);
    }
    let a = index.get("a").unwrap();
    assert_eq!(a.postings[0].doc_id, 1);
    assert_eq!(a.postings[0].term_frequency, 2);
    assert_eq!(a.postings[0].weight, (1.0 + 2f64.log10()) * 1.5f64.log10());
    assert_eq!(a.postings[1].weight, 1.5f64.log10());

    let v = idx.vectors().get(3).unwrap();
    assert_eq!(v[0], 1.5f64.log10());
    assert_eq!(v[1], 0.0);
    assert_eq!(v[2], (1.0 + 2f64.log10()) * 1.5f64.log10());
}

#[test]
fn query_without_vocabulary_terms_has_no_candidates() {
    let idx = build(&["a b a", "b c", "a c c"], &EngineConfig::default());
    let r = idx.query_terms(&["zzz", "yyy"]);
    assert_eq!(r.candidates, 0);
    assert!(r.is_empty());
    assert_eq!(r.cluster, None);
    let none: [&str; 0] = [];
    assert!(idx.query_terms(&none).is_empty());
}

#[test]
fn single_champion_per_term() {
    let config = EngineConfig { champion_size: 1, ..Default::default() };
    let idx = build(&["a b a", "b c", "a c c"], &config);
    for id in 0..idx.index().len() {
        assert_eq!(idx.champions().get(id).len(), 1);
    }
    let a = idx.index().term_id("a").unwrap();
    assert_eq!(idx.champions().get(a), &[1]);
    let c = idx.index().term_id("c").unwrap();
    assert_eq!(idx.champions().get(c), &[3]);

    let r = idx.query_terms(&["a"]);
    assert_eq!(r.candidates, 1);
    assert_eq!(r.doc_ids(), vec![1]);
}

#[test]
fn pruning_respects_ratio_and_protected_length() {
    let docs = [
        "the house stands", "the garden grows", "the house garden", "the river",
        "the tower", "the stone house", "the window", "the rain", "a door", "a roof",
    ];
    let idx = build(&docs, &EngineConfig::default());
    let index = idx.index();
    assert!(index.get("the").is_none());
    assert!(index.get("house").is_some());
    for entry in index.entries() {
        let short = entry.term.chars().count() < 5;
        assert!(!(short && entry.document_frequency() as f64 >= 0.7 * 10.0), "{} survived", entry.term);
    }

    let protected = build(&["ubiquitous x", "ubiquitous y", "ubiquitous z"], &EngineConfig::default());
    let entry = protected.index().get("ubiquitous").unwrap();
    assert_eq!(entry.idf, 1.0);
    assert!(entry.postings.iter().all(|p| p.weight == 0.0));
}

#[test]
fn ranking_is_bounded_sorted_and_unique() {
    let docs = [
        "solar panel energy", "solar energy storage energy", "wind energy",
        "battery storage", "solar wind hybrid", "grid storage battery battery",
        "panel cleaning", "hydro power",
    ];
    let config = EngineConfig { top_k: 3, ..Default::default() };
    let idx = build(&docs, &config);
    let r = idx.query_terms(&["solar", "storage", "energy", "solar"]);
    assert!(r.hits.len() <= 3);
    assert!(!r.is_empty());
    for pair in r.hits.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    let mut ids = r.doc_ids();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), r.hits.len());
    assert!(r.hits.iter().all(|h| h.similarity != 0.0 && h.similarity <= 1.0 + 1e-12));
    assert_eq!(r.doc_ids()[0], 2);
}
