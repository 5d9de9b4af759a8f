// Split a flat token stream back into sentences and documents
// Tokens must arrive with equal keys contiguous; nothing is re-sorted or hashed

use crate::error::TokenError;
use crate::field::{Field, FieldValue};
use crate::token::Token;
use itertools::structs::ChunkBy;
use itertools::Itertools;

/// Grouping key read from each token; a token whose key cannot be read
/// carries the lookup error instead
pub type RunKey = Result<FieldValue, TokenError>;

type KeyFn = fn(&Token) -> RunKey;

/// Runs of adjacent tokens sharing a sentence or document key
///
/// Built on [`Itertools::chunk_by`]: every run is a forward-only iterator
/// reading from the same cursor over the source, so no run and no corpus is
/// collected up front. Runs should be consumed in order; keeping an earlier
/// run alive while advancing makes the source buffer its remaining tokens.
pub struct Runs<I: Iterator<Item = Token>> {
    chunks: ChunkBy<RunKey, I, KeyFn>,
}

impl<I: Iterator<Item = Token>> Runs<I> {
    fn new(source: I, key: KeyFn) -> Self {
        Self {
            chunks: source.chunk_by(key),
        }
    }

    /// Iterate the runs in source order
    ///
    /// A token whose key is unset or ambiguous yields one `Err` in place of
    /// its run, and iteration ends there.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = Result<impl Iterator<Item = Token> + '_, TokenError>> + '_ {
        let mut failed = false;
        (&self.chunks).into_iter().map_while(move |(key, run)| {
            if failed {
                return None;
            }
            match key {
                Ok(_) => Some(Ok(run)),
                Err(e) => {
                    failed = true;
                    Some(Err(e))
                }
            }
        })
    }

    /// Collect every run into its own `Vec`
    pub fn collect_runs(self) -> Result<Vec<Vec<Token>>, TokenError> {
        let runs = self.iter().map(|run| run.map(Iterator::collect)).collect();
        runs
    }
}

/// Integral floats compare equal to the matching int
fn normalize(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            FieldValue::Int(*f as i64)
        }
        FieldValue::List(items) => FieldValue::List(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}

fn run_key(token: &Token, field: Field) -> RunKey {
    token.get_field(field, None).map(normalize)
}

fn sentence_key(token: &Token) -> RunKey {
    run_key(token, Field::Sentence)
}

fn document_key(token: &Token) -> RunKey {
    run_key(token, Field::Doc)
}

/// Group consecutive tokens sharing the same `sentence` value
///
/// ```
/// use llppipeline::{get_sentences, Field, Token};
///
/// let tokens = [1, 1, 2].map(|s| {
///     let mut token = Token::new();
///     token.set_field(Field::Sentence, "tokenizer", s);
///     token
/// });
/// let lengths: Vec<usize> = get_sentences(tokens)
///     .iter()
///     .map(|run| run.unwrap().count())
///     .collect();
/// assert_eq!(lengths, vec![2, 1]);
/// ```
pub fn get_sentences<T>(tokens: T) -> Runs<T::IntoIter>
where
    T: IntoIterator<Item = Token>,
{
    Runs::new(tokens.into_iter(), sentence_key)
}

/// Group consecutive tokens sharing the same `doc` value
pub fn get_documents<T>(tokens: T) -> Runs<T::IntoIter>
where
    T: IntoIterator<Item = Token>,
{
    Runs::new(tokens.into_iter(), document_key)
}
