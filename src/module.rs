// Annotation module contract and its option bag
// A module reads tokens and adds (field, module name) entries via Token::set_field

use crate::error::TokenError;
use crate::token::Token;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One annotation step of a pipeline
pub trait Module {
    /// Name recorded as the module half of every field this module sets
    fn name(&self) -> &str;

    /// Annotate `tokens` according to `config`
    fn process(&self, tokens: Vec<Token>, config: &ModuleConfig) -> Result<Vec<Token>>;
}

/// Value of a single module option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Int(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

/// Named options passed to [`Module::process`]
///
/// Which names a module recognizes is up to the module. Getters return
/// `Ok(None)` for absent options and an error when the option exists with
/// another type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleConfig {
    options: IndexMap<String, OptionValue>,
}

impl ModuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ModuleConfig::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.options.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, TokenError> {
        match self.get(name) {
            None => Ok(None),
            Some(OptionValue::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(invalid(name, "a boolean")),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<Option<i64>, TokenError> {
        match self.get(name) {
            None => Ok(None),
            Some(OptionValue::Int(i)) => Ok(Some(*i)),
            Some(_) => Err(invalid(name, "an integer")),
        }
    }

    /// Integers are widened
    pub fn get_float(&self, name: &str) -> Result<Option<f64>, TokenError> {
        match self.get(name) {
            None => Ok(None),
            Some(OptionValue::Float(x)) => Ok(Some(*x)),
            Some(OptionValue::Int(i)) => Ok(Some(*i as f64)),
            Some(_) => Err(invalid(name, "a number")),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<Option<&str>, TokenError> {
        match self.get(name) {
            None => Ok(None),
            Some(OptionValue::Str(s)) => Ok(Some(s)),
            Some(_) => Err(invalid(name, "a string")),
        }
    }
}

fn invalid(option: &str, expected: &'static str) -> TokenError {
    TokenError::InvalidOption {
        option: option.to_string(),
        expected,
    }
}
