use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use vsm_core::{CentroidMode, Engine, EngineConfig, Normalizer, PersianNormalizer, QueryResult, WhitespaceNormalizer};

/// Typing this line ends the interactive loop.
pub const EXIT_SENTINEL: &str = "۰۰۰";
pub const PROMPT: &str = "\nعبارت مورد نظر خود برای جست‌وجو را وارد کنید (برای خروج ۰۰۰ (سه صفر) را وارد کنید):";
pub const NO_RESULTS: &str = "چیزی پیدا نکردیم؛ لطفا کلمات جست‌وجوی خود را دقیق‌تر کنید یا کلمات بیش‌تری را به کار ببرید.";
pub const RESULTS_HEADER: &str = "نتایج:";

#[derive(Subcommand)]
pub enum Commands {
    /// Read queries from stdin until ۰۰۰ or end of input
    Repl,
    /// Run a single query and exit
    Query {
        /// Query text
        text: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum NormalizerKind {
    /// Persian affix stripping
    Persian,
    /// Tokens are already normalized terms
    Whitespace,
}

impl NormalizerKind {
    pub fn build(self) -> Box<dyn Normalizer> {
        match self {
            NormalizerKind::Persian => Box::new(PersianNormalizer),
            NormalizerKind::Whitespace => Box::new(WhitespaceNormalizer),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CentroidArg {
    Pairwise,
    Mean,
}

impl From<CentroidArg> for CentroidMode {
    fn from(arg: CentroidArg) -> Self {
        match arg {
            CentroidArg::Pairwise => CentroidMode::Pairwise,
            CentroidArg::Mean => CentroidMode::Mean,
        }
    }
}

#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Corpus directory: numbered N.txt files, or one subdirectory per cluster with --clustered
    #[arg(long)]
    pub corpus: PathBuf,
    /// JSON file with engine parameters; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of documents (default: discovered from the corpus)
    #[arg(long)]
    pub num_docs: Option<u32>,
    /// Champion list length
    #[arg(long)]
    pub champions: Option<usize>,
    /// Number of results
    #[arg(long)]
    pub top_k: Option<usize>,
    /// Document-frequency ratio above which short terms are pruned
    #[arg(long)]
    pub prune_ratio: Option<f64>,
    /// Terms with at least this many characters are never pruned
    #[arg(long)]
    pub min_term_len: Option<usize>,
    /// Route queries through per-directory clusters
    #[arg(long, default_value_t = false)]
    pub clustered: bool,
    /// How cluster centroids are averaged
    #[arg(long, value_enum)]
    pub centroid: Option<CentroidArg>,
    #[arg(long, value_enum, default_value_t = NormalizerKind::Persian)]
    pub normalizer: NormalizerKind,
}

impl EngineArgs {
    /// Defaults, then the config file, then flags.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(n) = self.num_docs { config.num_docs = Some(n); }
        if let Some(r) = self.champions { config.champion_size = r; }
        if let Some(k) = self.top_k { config.top_k = k; }
        if let Some(ratio) = self.prune_ratio { config.prune_ratio = ratio; }
        if let Some(len) = self.min_term_len { config.min_protected_len = len; }
        if self.clustered { config.clustering = true; }
        if let Some(c) = self.centroid { config.centroid = c.into(); }
        config.validate()?;
        Ok(config)
    }

    pub fn open_engine(&self) -> Result<Engine> {
        let config = self.engine_config()?;
        tracing::debug!(?config, "engine configuration");
        Engine::open(&self.corpus, &config, self.normalizer.build())
    }
}

pub fn write_results<W: Write>(engine: &Engine, result: &QueryResult, out: &mut W) -> Result<()> {
    if result.is_empty() {
        writeln!(out, "{NO_RESULTS}")?;
        return Ok(());
    }
    writeln!(out, "{RESULTS_HEADER}")?;
    for hit in &result.hits {
        writeln!(out, "{}", engine.display_name(hit.doc_id))?;
    }
    Ok(())
}

/// Prompt, read a line, answer it; stop at the sentinel or end of input.
pub fn run_repl<R: BufRead, W: Write>(engine: &Engine, mut input: R, out: &mut W) -> Result<()> {
    let mut line = String::new();
    loop {
        writeln!(out, "{PROMPT}")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let q = line.trim();
        if q == EXIT_SENTINEL {
            break;
        }
        let result = engine.query(q);
        write_results(engine, &result, out)?;
    }
    Ok(())
}
