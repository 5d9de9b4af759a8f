// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests
#![allow(dead_code)]

use llppipeline::{Field, Token};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Module name used for the fields set by `tokenized`
pub const TOKENIZER: &str = "test_tokenizer";

/// Test fixture helper for creating temporary directories holding token dumps
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Write tokens as a JSON Lines dump at `relative_path`
    pub fn create_token_dump<P: AsRef<Path>>(&self, relative_path: P, tokens: &[Token]) -> PathBuf {
        let content: String = tokens
            .iter()
            .map(|t| serde_json::to_string(t).expect("Failed to serialize token") + "\n")
            .collect();
        self.create_raw_file(relative_path, &content)
    }

    /// Write arbitrary content, creating parent directories if needed
    pub fn create_raw_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Stats output path inside the fixture
    pub fn stats_path(&self) -> PathBuf {
        self.root_path.join("stats.json")
    }
}

/// Token with the four tokenizer fields set by [`TOKENIZER`]
pub fn tokenized(doc: &str, id: i64, word: &str, sentence: i64) -> Token {
    let mut token = Token::new();
    token.set_field(Field::Doc, TOKENIZER, doc);
    token.set_field(Field::Id, TOKENIZER, id);
    token.set_field(Field::Word, TOKENIZER, word);
    token.set_field(Field::Sentence, TOKENIZER, sentence);
    token
}

/// Tokens for `(doc, sentence, words)` triples in order, with running ids per document
pub fn corpus(sentences: &[(&str, i64, &str)]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_doc = "";
    let mut id = 0;
    for &(doc, sentence, words) in sentences {
        if doc != current_doc {
            current_doc = doc;
            id = 0;
        }
        for word in words.split_whitespace() {
            tokens.push(tokenized(doc, id, word, sentence));
            id += 1;
        }
    }
    tokens
}
