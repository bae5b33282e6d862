use crate::cluster::CentroidMode;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_CHAMPION_SIZE: usize = 6;
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_PRUNE_RATIO: f64 = 0.7;
pub const DEFAULT_MIN_PROTECTED_LEN: usize = 5;

/// Parameters of the build pipeline and of query evaluation.
///
/// Every field has a default, so a JSON config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Total document count N. Discovered from the corpus when unset.
    pub num_docs: Option<u32>,
    /// Maximum champion list length R.
    pub champion_size: usize,
    /// Number of results k.
    pub top_k: usize,
    /// Terms present in at least `prune_ratio * N` documents are pruned...
    pub prune_ratio: f64,
    /// ...unless they have at least this many characters.
    pub min_protected_len: usize,
    /// Compute idf and posting weights. Without weighting every posting weighs 0.
    pub weighting: bool,
    /// Route queries to the nearest cluster before ranking.
    pub clustering: bool,
    pub centroid: CentroidMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_docs: None,
            champion_size: DEFAULT_CHAMPION_SIZE,
            top_k: DEFAULT_TOP_K,
            prune_ratio: DEFAULT_PRUNE_RATIO,
            min_protected_len: DEFAULT_MIN_PROTECTED_LEN,
            weighting: true,
            clustering: false,
            centroid: CentroidMode::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        let config: EngineConfig =
            serde_json::from_str(&buf).with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.champion_size == 0 {
            bail!("champion_size must be at least 1");
        }
        if self.top_k == 0 {
            bail!("top_k must be at least 1");
        }
        if !self.prune_ratio.is_finite() || self.prune_ratio <= 0.0 || self.prune_ratio > 1.0 {
            bail!("prune_ratio must lie in (0, 1], got {}", self.prune_ratio);
        }
        if self.num_docs == Some(0) {
            bail!("num_docs must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let c = EngineConfig::default();
        assert_eq!(c.champion_size, 6);
        assert_eq!(c.top_k, 5);
        assert_eq!(c.prune_ratio, 0.7);
        assert_eq!(c.min_protected_len, 5);
        assert!(c.weighting);
        assert!(!c.clustering);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: EngineConfig = serde_json::from_str(r#"{"top_k": 3, "centroid": "mean"}"#).unwrap();
        assert_eq!(c.top_k, 3);
        assert_eq!(c.champion_size, 6);
        assert_eq!(c.centroid, CentroidMode::Mean);
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut c = EngineConfig::default();
        c.champion_size = 0;
        assert!(c.validate().is_err());

        let mut c = EngineConfig::default();
        c.prune_ratio = 1.5;
        assert!(c.validate().is_err());

        let mut c = EngineConfig::default();
        c.prune_ratio = f64::NAN;
        assert!(c.validate().is_err());
    }
}
