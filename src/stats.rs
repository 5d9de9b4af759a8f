// Corpus statistics for token dumps, regrouped through get_documents / get_sentences

use crate::error::TokenError;
use crate::grouping::{get_documents, get_sentences};
use crate::token::Token;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Per-file corpus statistics
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FileStats {
    /// Path of the token dump
    pub path: String,
    /// Number of `doc` runs
    pub documents: u64,
    /// Number of `sentence` runs across all documents
    pub sentences: u64,
    pub tokens: u64,
    /// Tokens carrying each annotation, keyed `field@module`
    pub coverage: BTreeMap<String, u64>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Processing status (success, failed)
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl FileStats {
    /// Stats entry for a dump that could not be read or grouped
    pub fn failed(path: &str, error: String) -> Self {
        Self {
            path: path.to_string(),
            status: "failed".to_string(),
            error: Some(error),
            ..Default::default()
        }
    }
}

/// Whole-run statistics written by `--stats-out`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunStats {
    /// Unix timestamp (seconds) when the run started
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub total_documents: u64,
    pub total_sentences: u64,
    pub total_tokens: u64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub file_stats: Vec<FileStats>,
}

impl RunStats {
    pub fn new(run_start: u64) -> Self {
        Self {
            run_start,
            ..Default::default()
        }
    }

    /// Fold one file's stats into the run totals
    pub fn record(&mut self, stats: FileStats) {
        if stats.error.is_some() {
            self.files_failed += 1;
        } else {
            self.files_processed += 1;
            self.total_documents += stats.documents;
            self.total_sentences += stats.sentences;
            self.total_tokens += stats.tokens;
        }
        self.total_processing_time_ms += stats.processing_time_ms;
        self.file_stats.push(stats);
    }
}

/// Group a dump's tokens into documents and sentences and count them
///
/// Tokens must be ordered by document, then by sentence. A token whose `doc`
/// or `sentence` is unset or ambiguous fails the whole file.
pub fn summarize_tokens(path: &str, tokens: Vec<Token>) -> Result<FileStats, TokenError> {
    let start_time = std::time::Instant::now();
    let mut stats = FileStats {
        path: path.to_string(),
        ..Default::default()
    };

    let documents = get_documents(tokens);
    for document in documents.iter() {
        let document = document?;
        stats.documents += 1;

        let sentences = get_sentences(document);
        for sentence in sentences.iter() {
            let sentence = sentence?;
            stats.sentences += 1;

            for token in sentence {
                stats.tokens += 1;
                for (field, module, _) in token.annotations() {
                    *stats.coverage.entry(format!("{field}@{module}")).or_insert(0) += 1;
                }
            }
        }
    }

    stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
    stats.status = "success".to_string();

    debug!(
        "Summarized {}: {} documents, {} sentences, {} tokens",
        path, stats.documents, stats.sentences, stats.tokens
    );
    Ok(stats)
}

/// Write run statistics as pretty-printed JSON
pub async fn write_run_stats(stats_path: &Path, stats: &RunStats) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;

    if let Some(parent) = stats_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(stats_path, content).await?;
    info!("Wrote run stats to {}", stats_path.display());
    Ok(())
}
