// Error taxonomy for the annotated token store
// Failures here signal a missing or duplicate annotation upstream and are never recovered locally

use crate::field::Field;
use thiserror::Error;

/// Errors raised when reading or writing token annotations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// No module (or not the requested module) has set the field
    #[error(
        "field `{field}` not set{}",
        .module.as_ref().map(|m| format!(" by module `{m}`")).unwrap_or_default()
    )]
    FieldNotSet { field: Field, module: Option<String> },

    /// A module-unspecified read matched more than one module
    #[error(
        "field `{field}` set by multiple modules ({}); call get_field(field, Some(module))",
        .modules.join(", ")
    )]
    AmbiguousField { field: Field, modules: Vec<String> },

    /// Attribute-style write to a recognized field
    #[error("field `{field}` needs to be set with set_field(field, module, value)")]
    ImmutableField { field: Field },

    #[error("`{0}` is not a recognized field name")]
    UnknownField(String),

    #[error("attribute `{0}` not set")]
    UnknownAttribute(String),

    /// Typed accessor found a value of another type
    #[error("field `{field}` holds a value that is not {expected}")]
    WrongType { field: Field, expected: &'static str },

    /// Module option present with an unexpected type
    #[error("option `{option}` is not {expected}")]
    InvalidOption { option: String, expected: &'static str },
}
