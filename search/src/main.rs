use anyhow::Result;
use clap::Parser;
use search::{run_repl, write_results, Commands, EngineArgs};
use std::io::{self, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Rank documents of a numbered corpus against free-text queries", long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let engine = cli.engine.open_engine()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Repl => run_repl(&engine, io::stdin().lock(), &mut out)?,
        Commands::Query { text } => {
            let result = engine.query(&text);
            write_results(&engine, &result, &mut out)?;
        }
    }
    out.flush()?;
    engine.shutdown();
    Ok(())
}
