// Tokenizer contract: readable text in, tokens out
// Concrete tokenizers live outside this crate

use crate::error::TokenError;
use crate::field::Field;
use crate::token::Token;
use anyhow::Result;
use std::io::{BufRead, Cursor};

/// Fields every tokenizer must populate on every token
pub const REQUIRED_FIELDS: [Field; 4] = [Field::Doc, Field::Id, Field::Word, Field::Sentence];

/// Turns a text source into tokens
pub trait Tokenizer {
    /// Module name recorded on the fields this tokenizer sets
    fn name(&self) -> &str;

    /// Tokenize `source`, using `name` to identify it in the `doc` field
    ///
    /// Every returned token carries at least [`REQUIRED_FIELDS`].
    fn tokenize(&self, source: &mut dyn BufRead, name: &str) -> Result<Vec<Token>>;

    /// Tokenize an in-memory string
    fn tokenize_str(&self, text: &str, name: &str) -> Result<Vec<Token>> {
        self.tokenize(&mut Cursor::new(text.as_bytes()), name)
    }
}

/// Check that each token has the fields a tokenizer must provide
///
/// Fields set by several modules count as present.
pub fn validate_tokens(tokens: &[Token]) -> Result<(), TokenError> {
    for token in tokens {
        for field in REQUIRED_FIELDS {
            if token.modules_for(field).next().is_none() {
                return Err(TokenError::FieldNotSet { field, module: None });
            }
        }
    }
    Ok(())
}
