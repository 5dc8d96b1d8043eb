//! The assembled document handed to the compiler.

use std::fmt;

use sha2::{Digest, Sha256};

use tikzcell_core::{RenderOptions, WrapMode, assemble, build_preamble, extract_tikzpicture};

/// Number of hex digits of the content hash used as file stem.
const STEM_LEN: usize = 16;

/// A fully assembled LaTeX document together with its intermediate parts.
///
/// The source is the user's fragment after the template pass. The preamble
/// is kept only when it was built from package and library lists, so it can
/// be inspected before compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexDocument {
    source: String,
    preamble: Option<String>,
    full_latex: String,
    wrap_mode: WrapMode,
}

impl TexDocument {
    /// Assembles `source` according to `options`.
    pub fn new(source: impl Into<String>, options: &RenderOptions) -> Self {
        let source = source.into();

        let (preamble, full_latex) = match options.wrap_mode() {
            WrapMode::FullDocument => (None, assemble(&source, options, "")),
            WrapMode::StandaloneDocument | WrapMode::TikzPicture => {
                let preamble = build_preamble(options);
                let full_latex = assemble(&source, options, &preamble);
                let built = options.preamble_override().is_none().then_some(preamble);
                (built, full_latex)
            }
        };

        Self {
            source,
            preamble,
            full_latex,
            wrap_mode: options.wrap_mode(),
        }
    }

    /// Returns the source after the template pass, before wrapping.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the built preamble, or `None` when a custom preamble was used
    /// or the source is a full document.
    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    /// Returns the complete LaTeX document.
    pub fn full_latex(&self) -> &str {
        &self.full_latex
    }

    /// Returns the wrap mode the document was assembled with.
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Returns the first `tikzpicture` environment of the document.
    pub fn tikz_code(&self) -> Option<&str> {
        extract_tikzpicture(&self.full_latex)
    }

    /// Returns a file stem derived from the document content.
    ///
    /// Identical documents share a stem; the value is stable across runs.
    pub fn file_stem(&self) -> String {
        let digest = format!("{:x}", Sha256::digest(self.full_latex.as_bytes()));
        digest[..STEM_LEN].to_string()
    }
}

impl fmt::Display for TexDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
