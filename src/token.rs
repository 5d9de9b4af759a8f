// Annotated token store: one word occurrence with annotations keyed by (field, module)
// Several modules may set the same field; reads without a module must be unambiguous

use crate::error::TokenError;
use crate::field::{Field, FieldValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One annotated word occurrence in a corpus
///
/// Annotations live under a `(Field, module name)` key so that two modules can
/// both set, say, `pos` without clobbering each other. Names outside the
/// [`Field`] set are plain attributes and are stored separately.
///
/// ```
/// use llppipeline::{Field, Token, TokenError};
///
/// let mut token = Token::new();
/// token.set_field(Field::Pos, "tagger_a", "NOUN");
/// assert_eq!(token.pos().unwrap(), "NOUN");
///
/// token.set_field(Field::Pos, "tagger_b", "PROPN");
/// assert!(matches!(token.pos(), Err(TokenError::AmbiguousField { .. })));
/// assert_eq!(token.get_field(Field::Pos, Some("tagger_b")).unwrap().as_str(), Some("PROPN"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TokenRecord", into = "TokenRecord")]
pub struct Token {
    fields: IndexMap<(Field, String), FieldValue>,
    attrs: IndexMap<String, FieldValue>,
}

impl Token {
    /// Create a token with no annotations
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field, optionally pinned to the module that set it
    ///
    /// Without a module the read only succeeds when exactly one module has set
    /// the field.
    pub fn get_field(&self, field: Field, module: Option<&str>) -> Result<&FieldValue, TokenError> {
        if let Some(module) = module {
            return self
                .fields
                .get(&(field, module.to_string()))
                .ok_or_else(|| TokenError::FieldNotSet {
                    field,
                    module: Some(module.to_string()),
                });
        }

        let mut candidates = self.fields.iter().filter(|((f, _), _)| *f == field);
        let Some((_, value)) = candidates.next() else {
            return Err(TokenError::FieldNotSet { field, module: None });
        };
        if candidates.next().is_some() {
            return Err(TokenError::AmbiguousField {
                field,
                modules: self.modules_for(field).map(str::to_string).collect(),
            });
        }
        Ok(value)
    }

    /// Store or overwrite the value a module assigns to a field
    pub fn set_field(&mut self, field: Field, module: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert((field, module.into()), value.into());
    }

    /// Attribute-style read
    ///
    /// Recognized field names behave like `get_field(field, None)`; any other
    /// name reads a plain attribute.
    pub fn get_attr(&self, name: &str) -> Result<&FieldValue, TokenError> {
        match Field::from_name(name) {
            Some(field) => self.get_field(field, None),
            None => self
                .attrs
                .get(name)
                .ok_or_else(|| TokenError::UnknownAttribute(name.to_string())),
        }
    }

    /// Attribute-style write
    ///
    /// Always rejects recognized field names; those must go through
    /// [`Token::set_field`].
    pub fn set_attr(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), TokenError> {
        if let Some(field) = Field::from_name(name) {
            return Err(TokenError::ImmutableField { field });
        }
        self.attrs.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Modules that have set `field`, in the order they first set it
    pub fn modules_for(&self, field: Field) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .filter(move |(f, _)| *f == field)
            .map(|(_, module)| module.as_str())
    }

    /// All annotations as `(field, module, value)`
    pub fn annotations(&self) -> impl Iterator<Item = (Field, &str, &FieldValue)> {
        self.fields
            .iter()
            .map(|((field, module), value)| (*field, module.as_str(), value))
    }

    /// Plain (non-field) attributes
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.attrs.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of (field, module) annotations
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn doc(&self) -> Result<&str, TokenError> {
        self.str_field(Field::Doc)
    }

    pub fn id(&self) -> Result<i64, TokenError> {
        self.int_field(Field::Id)
    }

    pub fn word(&self) -> Result<&str, TokenError> {
        self.str_field(Field::Word)
    }

    pub fn sentence(&self) -> Result<i64, TokenError> {
        self.int_field(Field::Sentence)
    }

    pub fn lemma(&self) -> Result<&str, TokenError> {
        self.str_field(Field::Lemma)
    }

    pub fn pos(&self) -> Result<&str, TokenError> {
        self.str_field(Field::Pos)
    }

    pub fn morph(&self) -> Result<&str, TokenError> {
        self.str_field(Field::Morph)
    }

    fn str_field(&self, field: Field) -> Result<&str, TokenError> {
        self.get_field(field, None)?
            .as_str()
            .ok_or(TokenError::WrongType { field, expected: "a string" })
    }

    fn int_field(&self, field: Field) -> Result<i64, TokenError> {
        self.get_field(field, None)?
            .as_int()
            .ok_or(TokenError::WrongType { field, expected: "an integer" })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, ((field, module), value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({field}, {module}): {value}")?;
        }
        f.write_str("}")
    }
}

/// One serialized `(field, module) -> value` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub field: Field,
    pub module: String,
    pub value: FieldValue,
}

/// Wire shape of a token in JSON Lines dumps
#[derive(Serialize, Deserialize)]
struct TokenRecord {
    #[serde(default)]
    fields: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attrs: IndexMap<String, FieldValue>,
}

impl From<TokenRecord> for Token {
    fn from(record: TokenRecord) -> Self {
        let mut token = Token {
            fields: IndexMap::with_capacity(record.fields.len()),
            attrs: record.attrs,
        };
        for Annotation { field, module, value } in record.fields {
            token.set_field(field, module, value);
        }
        token
    }
}

impl From<Token> for TokenRecord {
    fn from(token: Token) -> Self {
        TokenRecord {
            fields: token
                .fields
                .into_iter()
                .map(|((field, module), value)| Annotation { field, module, value })
                .collect(),
            attrs: token.attrs,
        }
    }
}
