//! Document assembly.
//!
//! [`assemble`] places a fragment inside the `standalone` document scaffold
//! according to the [`WrapMode`], indenting each nesting level by
//! [`INDENT`]. A scale factor other than `1.0` adds a `\scalebox` wrapper
//! around the body without changing the body's own indentation:
//!
//! ```text
//! \documentclass{standalone}
//! \usepackage{graphicx}
//! \usepackage{tikz}
//! \begin{document}
//!     \scalebox{2.0}{
//!     \begin{tikzpicture}
//!         \draw (0,0) -- (1,1);
//!     \end{tikzpicture}
//!     }
//! \end{document}
//! ```

use crate::options::{RenderOptions, WrapMode};

/// One level of indentation.
pub const INDENT: &str = "    ";

const DOCUMENT_CLASS: &str = "\\documentclass{standalone}";
const BEGIN_DOCUMENT: &str = "\\begin{document}";
const END_DOCUMENT: &str = "\\end{document}";
const BEGIN_TIKZPICTURE: &str = "\\begin{tikzpicture}";
const END_TIKZPICTURE: &str = "\\end{tikzpicture}";

/// Builds the complete document for `fragment`.
///
/// `preamble` is inserted verbatim after the document class line (a missing
/// trailing newline is added). In [`WrapMode::FullDocument`] mode the
/// fragment is returned as is, trimmed and terminated by one newline, and
/// both `preamble` and the scale factor are ignored.
///
/// The result always ends with exactly one newline.
pub fn assemble(fragment: &str, options: &RenderOptions, preamble: &str) -> String {
    let fragment = fragment.trim();

    if options.wrap_mode() == WrapMode::FullDocument {
        return if fragment.is_empty() {
            String::new()
        } else {
            format!("{fragment}\n")
        };
    }

    let mut document = String::with_capacity(fragment.len() * 2 + preamble.len() + 128);

    push_line(&mut document, 0, DOCUMENT_CLASS);
    document.push_str(preamble);
    if !preamble.is_empty() && !preamble.ends_with('\n') {
        document.push('\n');
    }
    push_line(&mut document, 0, BEGIN_DOCUMENT);

    if options.has_scale() {
        let scalebox = format!("\\scalebox{{{}}}{{", format_scale(options.scale()));
        push_line(&mut document, 1, &scalebox);
    }

    match options.wrap_mode() {
        WrapMode::TikzPicture => {
            push_line(&mut document, 1, BEGIN_TIKZPICTURE);
            push_block(&mut document, 2, fragment);
            push_line(&mut document, 1, END_TIKZPICTURE);
        }
        WrapMode::StandaloneDocument | WrapMode::FullDocument => {
            push_block(&mut document, 1, fragment);
        }
    }

    if options.has_scale() {
        push_line(&mut document, 1, "}");
    }

    push_line(&mut document, 0, END_DOCUMENT);
    document
}

/// Returns the first `tikzpicture` environment in `text`, including its
/// begin and end markers.
///
/// ```
/// use tikzcell_core::extract_tikzpicture;
///
/// let text = "a\n\\begin{tikzpicture}\n\\draw;\n\\end{tikzpicture}\nb";
/// assert_eq!(
///     extract_tikzpicture(text),
///     Some("\\begin{tikzpicture}\n\\draw;\n\\end{tikzpicture}")
/// );
/// assert_eq!(extract_tikzpicture("no picture"), None);
/// ```
pub fn extract_tikzpicture(text: &str) -> Option<&str> {
    let start = text.find(BEGIN_TIKZPICTURE)?;
    let end = text[start..].find(END_TIKZPICTURE)? + start + END_TIKZPICTURE.len();
    Some(&text[start..end])
}

/// Formats a scale factor as a plain decimal, keeping `.0` on whole numbers.
fn format_scale(scale: f64) -> String {
    format!("{scale:?}")
}

fn push_line(out: &mut String, level: usize, line: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

/// Indents every non-blank line of `block`; blank lines stay empty and a
/// blank block emits nothing.
fn push_block(out: &mut String, level: usize, block: &str) {
    if block.trim().is_empty() {
        return;
    }
    for line in block.lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            push_line(out, level, line);
        }
    }
}
