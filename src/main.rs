use anyhow::Result;
use clap::Parser;
use llppipeline::discovery;
use llppipeline::reader::{ReaderConfig, TokenReader};
use llppipeline::stats::{self, FileStats, RunStats};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "llppipeline")]
#[command(about = "Summarize annotated token dumps by document and sentence")]
#[command(version)]
struct Args {
    /// Root directory to scan for *.tokens.jsonl files
    root_dir: PathBuf,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Stats output file path
    #[arg(long, default_value = "corpus_stats.json")]
    stats_out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting llppipeline");
    info!(?args, "Parsed CLI arguments");

    if !args.root_dir.exists() {
        anyhow::bail!("Root directory does not exist: {}", args.root_dir.display());
    }

    if !args.root_dir.is_dir() {
        anyhow::bail!("Root path is not a directory: {}", args.root_dir.display());
    }

    let run_start = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let mut run_stats = RunStats::new(run_start);

    info!("Starting token dump discovery in: {}", args.root_dir.display());
    let discovered_files = discovery::discover_token_dumps(&args.root_dir).await?;

    let reader = TokenReader::new(ReaderConfig {
        fail_fast: args.fail_fast,
        ..Default::default()
    });

    for file in &discovered_files {
        let path_str = file.path.display().to_string();

        if let Some(ref error) = file.error {
            if args.fail_fast {
                anyhow::bail!("Unusable token dump {path_str}: {error}");
            }
            run_stats.record(FileStats::failed(&path_str, error.clone()));
            continue;
        }

        let (tokens, read_stats) = reader.read_tokens(&file.path).await?;
        if let Some(error) = read_stats.read_error {
            run_stats.record(FileStats::failed(&path_str, error));
            continue;
        }

        match stats::summarize_tokens(&path_str, tokens) {
            Ok(file_stats) => {
                info!(
                    "Summarized {}: {} documents, {} sentences, {} tokens",
                    path_str, file_stats.documents, file_stats.sentences, file_stats.tokens
                );
                run_stats.record(file_stats);
            }
            Err(e) => {
                if args.fail_fast {
                    return Err(anyhow::Error::new(e).context(format!("Failed to group {path_str}")));
                }
                warn!("Failed to group {}: {}", path_str, e);
                run_stats.record(FileStats::failed(&path_str, e.to_string()));
            }
        }
    }

    stats::write_run_stats(&args.stats_out, &run_stats).await?;

    println!("llppipeline v{} - corpus summary", env!("CARGO_PKG_VERSION"));
    println!("Found {} token dumps", discovered_files.len());
    println!("  Processed: {} files", run_stats.files_processed);
    if run_stats.files_failed > 0 {
        println!("  Failed: {} files", run_stats.files_failed);
    }
    println!("  Documents: {}", run_stats.total_documents);
    println!("  Sentences: {}", run_stats.total_sentences);
    println!("  Tokens: {}", run_stats.total_tokens);
    println!("Stats written to {}", args.stats_out.display());

    info!(
        "Run completed: {} processed, {} failed",
        run_stats.files_processed, run_stats.files_failed
    );

    Ok(())
}
