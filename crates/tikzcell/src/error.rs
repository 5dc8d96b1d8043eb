//! Error types for tikzcell operations.
//!
//! This module provides the main error type [`TikzcellError`] which wraps
//! the failures of every stage: option validation, the template pass,
//! compilation and saving.

use std::io;

use thiserror::Error;

use tikzcell_core::OptionsError;

use crate::{compile::CompileError, template::TemplateError};

/// The main error type for tikzcell operations.
///
/// # Diagnostic Variants
///
/// The `Template` variant keeps the template source next to the error so
/// that reporters can point at the offending line.
#[derive(Debug, Error)]
pub enum TikzcellError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("{err}")]
    Template { err: TemplateError, src: String },

    #[error("Compilation error: {0}")]
    Compile(#[from] CompileError),

    #[error("No TikZ picture to save")]
    NoTikzPicture,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TikzcellError {
    /// Create a new `Template` error with the associated template source.
    pub fn new_template_error(err: TemplateError, src: impl Into<String>) -> Self {
        Self::Template {
            err,
            src: src.into(),
        }
    }
}
