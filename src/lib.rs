pub mod error;
pub mod field;
pub mod token;
pub mod grouping;
pub mod tokenizer;
pub mod module;
pub mod discovery;
pub mod reader;
pub mod stats;

// Re-export the annotation model for convenient access
pub use error::TokenError;
pub use field::{Field, FieldValue};
pub use token::{Annotation, Token};
pub use grouping::{get_documents, get_sentences, RunKey, Runs};

// Re-export collaborator contracts
pub use tokenizer::{validate_tokens, Tokenizer, REQUIRED_FIELDS};
pub use module::{Module, ModuleConfig, OptionValue};

// Re-export corpus inspection utilities
pub use reader::{read_tokens_async, write_tokens, ReaderConfig, ReadStats, TokenReader};
pub use stats::{summarize_tokens, write_run_stats, FileStats, RunStats};
