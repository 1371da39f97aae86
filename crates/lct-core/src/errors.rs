//! Structured error types shared across LCT crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LctError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (monomials, indices, tolerances, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
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
}

/// Canonical error type for the truncation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LctError {
    /// Factorial requested outside its domain (negative or overflowing argument).
    #[error("factorial error: {0}")]
    Factorial(ErrorInfo),
    /// Adaptive quadrature failed to reach its accuracy target.
    #[error("quadrature error: {0}")]
    Quadrature(ErrorInfo),
    /// Failures reported by a basis provider or raw basis loader.
    #[error("basis error: {0}")]
    Basis(ErrorInfo),
    /// Violations detected while assembling Hermitian matrices.
    #[error("assembly error: {0}")]
    Assembly(ErrorInfo),
    /// Invalid user supplied options.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization, schema and IO errors.
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

impl LctError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LctError::Factorial(info)
            | LctError::Quadrature(info)
            | LctError::Basis(info)
            | LctError::Assembly(info)
            | LctError::Config(info)
            | LctError::Serde(info) => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            LctError::Factorial(info)
            | LctError::Quadrature(info)
            | LctError::Basis(info)
            | LctError::Assembly(info)
            | LctError::Config(info)
            | LctError::Serde(info) => info,
        }
    }

    /// Attaches an extra context entry while keeping the error family.
    ///
    /// Callers higher up the stack use this to record where a failure
    /// happened (matrix indices, operand monomials) without re-wrapping it.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info_mut().context.insert(key.into(), value.into());
        self
    }

    /// Sets a remediation hint while keeping the error family.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.info_mut().hint = Some(hint.into());
        self
    }

    /// Returns the stable machine readable code of the error.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
