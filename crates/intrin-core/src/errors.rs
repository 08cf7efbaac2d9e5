//! Structured error types shared across intrin crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`IntrinError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (names, counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Ordered list of individual findings, e.g. every failed constraint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
            details: Vec::new(),
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Replaces the ordered list of findings.
    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }
}

/// Canonical error type for intrinsic declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum IntrinError {
    /// Constraint evaluation and violation errors.
    #[error("constraint error: {0}")]
    Constraint(ErrorInfo),
    /// Argument binding errors raised before constraints run.
    #[error("binding error: {0}")]
    Binding(ErrorInfo),
    /// Declaration registry errors.
    #[error("registry error: {0}")]
    Registry(ErrorInfo),
    /// Resource ledger errors.
    #[error("resource error: {0}")]
    Resource(ErrorInfo),
    /// Parametric generator errors.
    #[error("generator error: {0}")]
    Generator(ErrorInfo),
    /// Errors reported by the external registration backend.
    #[error("backend error: {0}")]
    Backend(ErrorInfo),
    /// Serialization and configuration errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl IntrinError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            IntrinError::Constraint(info)
            | IntrinError::Binding(info)
            | IntrinError::Registry(info)
            | IntrinError::Resource(info)
            | IntrinError::Generator(info)
            | IntrinError::Backend(info)
            | IntrinError::Serde(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Returns true when the error carries the given code.
    pub fn is(&self, code: &str) -> bool {
        self.code() == code
    }
}

/// Stable error codes emitted by the intrin crates.
pub mod codes {
    /// One or more constraints evaluated falsy.
    pub const CONSTRAINT_VIOLATION: &str = "constraint.violation";
    /// A constraint variable had no binding in the evaluation context.
    pub const UNBOUND_VARIABLE: &str = "constraint.unbound_variable";
    /// Two runtime values cannot be ordered.
    pub const INCOMPARABLE: &str = "constraint.incomparable";
    /// More positional arguments than positional parameters.
    pub const TOO_MANY_POSITIONAL: &str = "binding.too_many_positional";
    /// A keyword did not match any parameter.
    pub const UNEXPECTED_KEYWORD: &str = "binding.unexpected_keyword";
    /// A positional-only parameter was passed by keyword.
    pub const POSITIONAL_ONLY: &str = "binding.positional_only";
    /// A parameter received both a positional and a keyword value.
    pub const MULTIPLE_VALUES: &str = "binding.multiple_values";
    /// A required parameter received no value.
    pub const MISSING_ARGUMENT: &str = "binding.missing_argument";
    /// A declaration name is already present in the registry.
    pub const DUPLICATE_NAME: &str = "registry.duplicate_name";
    /// Resource seed data was neither a mapping nor a list of pairs.
    pub const MALFORMED_RESOURCE_SHAPE: &str = "resource.malformed_shape";
    /// Two surviving generator combinations produced the same name suffix.
    pub const NAME_COLLISION: &str = "generator.name_collision";
}
