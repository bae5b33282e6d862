use crate::cluster::ClusterPartition;
use crate::index::IndexBuilder;
use crate::tokenizer::{tokenize, Normalizer};
use crate::DocId;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DOC_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub path: PathBuf,
    /// file stem, shown in results for clustered corpora
    pub name: String,
}

/// Numbered document set, optionally split into clusters.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
    partition: Option<ClusterPartition>,
}

impl Corpus {
    /// `<root>/1.txt ..= <root>/N.txt`. Without `num_docs`, N is the largest numbered file
    /// and the numbering must have no gaps.
    pub fn flat<P: AsRef<Path>>(root: P, num_docs: Option<u32>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            bail!("corpus directory {} not found", root.display());
        }
        let n = match num_docs {
            Some(n) => n,
            None => discover_numbered(root)?,
        };
        let mut documents = Vec::with_capacity(n as usize);
        for id in 1..=n {
            let path = root.join(format!("{id}.{DOC_EXTENSION}"));
            if !path.is_file() {
                bail!("missing document {}", path.display());
            }
            documents.push(Document { id, path, name: id.to_string() });
        }
        Ok(Self { documents, partition: None })
    }

    /// Every subdirectory of `root` is one cluster. Ids run consecutively through
    /// the clusters in directory-then-file order.
    pub fn clustered<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            bail!("corpus directory {} not found", root.display());
        }
        let mut dirs: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.into_path())
            .collect();
        sort_by_name(&mut dirs);
        if dirs.is_empty() {
            bail!("no cluster directories under {}", root.display());
        }

        let mut documents = Vec::new();
        let mut sizes = Vec::with_capacity(dirs.len());
        for dir in &dirs {
            let mut files: Vec<PathBuf> = WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file() && has_doc_extension(e.path()))
                .map(|e| e.into_path())
                .collect();
            sort_by_name(&mut files);
            sizes.push(files.len());
            for path in files {
                let id = documents.len() as DocId + 1;
                let name = stem(&path).unwrap_or_default().to_string();
                documents.push(Document { id, path, name });
            }
        }
        let partition = ClusterPartition::from_sizes(&sizes)
            .with_context(|| format!("reading clusters under {}", root.display()))?;
        Ok(Self { documents, partition: Some(partition) })
    }

    pub fn num_docs(&self) -> u32 { self.documents.len() as u32 }
    pub fn documents(&self) -> &[Document] { &self.documents }
    pub fn partition(&self) -> Option<&ClusterPartition> { self.partition.as_ref() }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        (doc_id as usize).checked_sub(1).and_then(|i| self.documents.get(i))
    }

    /// Read, normalize and fold every document, in parallel.
    ///
    /// Any unreadable file fails the whole build.
    pub fn ingest(&self, normalizer: &dyn Normalizer) -> Result<IndexBuilder> {
        self.documents
            .par_iter()
            .try_fold(IndexBuilder::new, |mut builder, doc| -> Result<IndexBuilder> {
                let text = fs::read_to_string(&doc.path)
                    .with_context(|| format!("reading document {}", doc.path.display()))?;
                builder.ingest_document(doc.id, tokenize(&text, normalizer));
                Ok(builder)
            })
            .try_reduce(IndexBuilder::new, |a, b| Ok(a.merge(b)))
    }
}

fn stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

fn has_doc_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(DOC_EXTENSION)
}

/// Numeric names in numeric order first, then the rest lexicographically.
fn sort_by_name(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| {
        let name = stem(p).unwrap_or_default().to_string();
        match name.parse::<u64>() {
            Ok(n) => (0, n, name),
            Err(_) => (1, 0, name),
        }
    });
}

fn discover_numbered(root: &Path) -> Result<u32> {
    let mut ids: Vec<u32> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && has_doc_extension(e.path()))
        .filter_map(|e| stem(e.path()).and_then(|s| s.parse::<u32>().ok()))
        .filter(|&id| id > 0)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        bail!("no numbered documents under {}", root.display());
    }
    for (expected, &id) in (1..).zip(ids.iter()) {
        if id != expected {
            bail!("document {expected}.{DOC_EXTENSION} missing under {}", root.display());
        }
    }
    Ok(ids.len() as u32)
}
