//! Validation errors for rendering options.
//!
//! Every failure is detected before any document is assembled or any
//! external program runs, so the caller can adjust its options and retry.

use thiserror::Error;

/// Errors raised while normalizing an [`OptionRequest`](crate::OptionRequest).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error(
        "cannot combine a custom preamble with `tex_packages`, `tikz_libraries` or `pgfplots_libraries`"
    )]
    ConflictingPreamble,

    #[error(
        "`--implicit-pic`, `--full-document` and `--as=<input_type>` select different input types"
    )]
    ConflictingWrapMode,

    #[error("`{selector}` is not a valid input type")]
    UnknownWrapMode { selector: String },

    #[error("no TeX/TikZ code was provided")]
    MissingFragment,

    #[error("scale, preamble, packages and libraries cannot be used with a full document")]
    FullDocumentOptions,

    #[error("scale must be a positive number, got {scale}")]
    InvalidScale { scale: f64 },
}

impl OptionsError {
    /// Returns a stable, searchable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConflictingPreamble => "tikzcell::options::conflicting_preamble",
            Self::ConflictingWrapMode => "tikzcell::options::conflicting_wrap_mode",
            Self::UnknownWrapMode { .. } => "tikzcell::options::unknown_wrap_mode",
            Self::MissingFragment => "tikzcell::options::missing_fragment",
            Self::FullDocumentOptions => "tikzcell::options::full_document_options",
            Self::InvalidScale { .. } => "tikzcell::options::invalid_scale",
        }
    }

    /// Returns a hint on how to fix the offending option combination.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::ConflictingPreamble => {
                Some("put the packages and libraries in the preamble, or drop the preamble")
            }
            Self::ConflictingWrapMode => Some("select the input type with `--as` only"),
            Self::UnknownWrapMode { .. } => Some(
                "valid input types are `full-document`, `standalone-document` and `tikzpicture`",
            ),
            Self::MissingFragment => Some("pass an input file, `-` for stdin, or `--code`"),
            Self::FullDocumentOptions => {
                Some("a full document carries its own preamble; edit it directly")
            }
            Self::InvalidScale { .. } => None,
        }
    }
}
