use crate::token::Token;
use anyhow::Result;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

/// Configuration for token dump reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or return partial results
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics for one token dump read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub tokens_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Async reader for JSON Lines token dumps, one token per line
pub struct TokenReader {
    config: ReaderConfig,
}

impl TokenReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Stream a dump line by line, deserializing each non-blank line as a token
    ///
    /// Without `fail_fast`, an unreadable or malformed line stops the read and
    /// the tokens decoded so far are returned with `read_error` set.
    pub async fn read_tokens<P: AsRef<Path>>(&self, file_path: P) -> Result<(Vec<Token>, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of token dump: {}", path.display());

        let mut stats = ReadStats {
            file_path: path.display().to_string(),
            lines_read: 0,
            tokens_read: 0,
            bytes_read: 0,
            duration_ms: 0,
            read_error: None,
        };

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                let error_msg = format!("Failed to open token dump {}: {}", path.display(), e);
                return self.fail(error_msg, Vec::new(), stats, start_time);
            }
        };

        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut lines = reader.lines();
        let mut tokens = Vec::new();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    let error_msg = format!(
                        "Read error in {} at line {}: {}",
                        path.display(),
                        stats.lines_read + 1,
                        e
                    );
                    return self.fail(error_msg, tokens, stats, start_time);
                }
            };

            stats.lines_read += 1;
            stats.bytes_read += line.len() as u64 + 1; // +1 for newline

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Token>(&line) {
                Ok(token) => {
                    tokens.push(token);
                    stats.tokens_read += 1;
                }
                Err(e) => {
                    let error_msg = format!(
                        "Malformed token in {} at line {}: {}",
                        path.display(),
                        stats.lines_read,
                        e
                    );
                    return self.fail(error_msg, tokens, stats, start_time);
                }
            }
        }

        stats.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Read {}: {} tokens from {} lines, {} bytes in {}ms",
            path.display(),
            stats.tokens_read,
            stats.lines_read,
            stats.bytes_read,
            stats.duration_ms
        );

        Ok((tokens, stats))
    }

    /// Read several dumps one after another
    pub async fn read_files_batch<P: AsRef<Path>>(
        &self,
        file_paths: &[P],
    ) -> Result<Vec<(Vec<Token>, ReadStats)>> {
        info!("Starting batch read of {} token dumps", file_paths.len());

        let mut results = Vec::with_capacity(file_paths.len());

        // WHY: sequential reads keep at most one dump in flight
        for file_path in file_paths {
            results.push(self.read_tokens(file_path).await?);
        }

        info!("Completed batch read of {} token dumps", results.len());
        Ok(results)
    }

    fn fail(
        &self,
        error_msg: String,
        tokens: Vec<Token>,
        mut stats: ReadStats,
        start_time: std::time::Instant,
    ) -> Result<(Vec<Token>, ReadStats)> {
        warn!("{}", error_msg);

        if self.config.fail_fast {
            return Err(anyhow::anyhow!(error_msg));
        }

        stats.duration_ms = start_time.elapsed().as_millis() as u64;
        stats.read_error = Some(error_msg);
        Ok((tokens, stats))
    }
}

/// Read a whole dump, failing on the first unreadable or malformed line
pub async fn read_tokens_async<P: AsRef<Path>>(file_path: P) -> Result<Vec<Token>> {
    let reader = TokenReader::new(ReaderConfig { fail_fast: true, ..Default::default() });
    let (tokens, _stats) = reader.read_tokens(file_path).await?;
    Ok(tokens)
}

/// Write tokens as a JSON Lines dump, one token per line
pub async fn write_tokens<P: AsRef<Path>>(file_path: P, tokens: &[Token]) -> Result<()> {
    let file = File::create(file_path.as_ref()).await?;
    let mut writer = BufWriter::new(file);

    for token in tokens {
        let line = serde_json::to_string(token)?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    debug!("Wrote {} tokens to {}", tokens.len(), file_path.as_ref().display());
    Ok(())
}
