// Locate JSON Lines token dumps under a corpus root

use crate::token::Token;
use anyhow::{Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// File name suffix of JSON Lines token dumps
pub const TOKEN_DUMP_SUFFIX: &str = ".tokens.jsonl";

/// A path matched by name, with the reason it can't be read as a dump
#[derive(Debug, Clone)]
pub struct DumpCandidate {
    pub path: PathBuf,
    pub error: Option<String>,
}

impl DumpCandidate {
    pub fn is_usable(&self) -> bool {
        self.error.is_none()
    }
}

/// Check that `path` is a regular file whose first non-blank line decodes as a token
///
/// An empty file is an empty dump. Later lines are left to the reader.
pub async fn check_token_dump(path: &Path) -> Result<(), String> {
    let metadata = fs::metadata(path).await.map_err(|e| format!("cannot access: {e}"))?;
    if !metadata.is_file() {
        return Err("not a regular file".to_string());
    }

    let file = File::open(path).await.map_err(|e| format!("cannot open: {e}"))?;
    let mut lines = BufReader::new(file).lines();
    while let Some(line) = lines.next_line().await.map_err(|e| format!("cannot read: {e}"))? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        return serde_json::from_str::<Token>(line)
            .map(|_| ())
            .map_err(|e| format!("first line is not a token: {e}"));
    }
    Ok(())
}

/// Every `**/*.tokens.jsonl` under `root_dir`, sorted by path
///
/// Unusable matches are returned with `error` set rather than dropped, so
/// callers can report them.
pub async fn discover_token_dumps(root_dir: impl AsRef<Path>) -> Result<Vec<DumpCandidate>> {
    let root_dir = root_dir.as_ref();
    let pattern = format!("{}/**/*{}", root_dir.display(), TOKEN_DUMP_SUFFIX);
    debug!("Globbing token dumps with pattern: {}", pattern);

    let mut candidates = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("Invalid dump pattern {pattern}"))? {
        let candidate = match entry {
            Ok(path) => {
                let error = check_token_dump(&path).await.err();
                DumpCandidate { path, error }
            }
            // unreadable directory somewhere under the root
            Err(e) => DumpCandidate {
                path: e.path().to_path_buf(),
                error: Some(e.error().to_string()),
            },
        };

        match &candidate.error {
            Some(error) => warn!("Unusable token dump {}: {}", candidate.path.display(), error),
            None => debug!("Found token dump: {}", candidate.path.display()),
        }
        candidates.push(candidate);
    }
    candidates.sort_by(|a, b| a.path.cmp(&b.path));

    let unusable = candidates.iter().filter(|c| !c.is_usable()).count();
    info!(
        "Discovered {} token dumps under {} ({} unusable)",
        candidates.len(),
        root_dir.display(),
        unusable
    );
    Ok(candidates)
}

/// Paths of the usable token dumps under `root_dir`
pub async fn find_token_files<P: AsRef<Path>>(root_dir: P) -> Result<Vec<PathBuf>> {
    Ok(discover_token_dumps(root_dir)
        .await?
        .into_iter()
        .filter(DumpCandidate::is_usable)
        .map(|c| c.path)
        .collect())
}
