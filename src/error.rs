//! Error types for loading a post collection

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A malformed field, not yet tied to a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a required key that is absent
    pub fn missing(field: &str) -> Self {
        Self::new(field, "required field is missing")
    }

    /// Attach the offending document
    pub fn at(self, document: impl Into<PathBuf>) -> ValidationError {
        ValidationError {
            document: document.into(),
            field: self.field,
            reason: self.reason,
        }
    }
}

/// A document whose metadata failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: invalid `{field}`: {reason}", .document.display())]
pub struct ValidationError {
    pub document: PathBuf,
    pub field: String,
    pub reason: String,
}

/// Errors produced while loading a post collection
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source location not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("duplicate slug `{slug}`: {} conflicts with {}", .second.display(), .first.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),
}

impl LoadError {
    /// The document (or location) this error is about, if any
    pub fn document(&self) -> Option<&Path> {
        match self {
            LoadError::NotFound { path } => Some(path),
            LoadError::Validation(e) => Some(&e.document),
            LoadError::DuplicateSlug { second, .. } => Some(second),
            LoadError::Io { path, .. } => Some(path),
            LoadError::Walk(e) => e.path(),
            LoadError::InvalidPattern(_) => None,
        }
    }

    /// The offending field, for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            LoadError::Validation(e) => Some(&e.field),
            _ => None,
        }
    }
}
