//! Error adapter for converting TikzcellError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Template errors carry the template source, so their diagnostic points at
//! the failing line. Every other error is rendered with its code and, where
//! one exists, a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use tikzcell::{TemplateError, TikzcellError, compile::CompileError};

/// Adapter for a template error with its source.
pub struct TemplateDiagnostic<'a> {
    /// The wrapped template error
    err: &'a TemplateError,
    /// Template source for displaying snippets
    src: &'a str,
}

impl<'a> TemplateDiagnostic<'a> {
    /// Create a new template diagnostic.
    pub fn new(err: &'a TemplateError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for TemplateDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateDiagnostic")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for TemplateDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for TemplateDiagnostic<'_> {}

impl MietteDiagnostic for TemplateDiagnostic<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err {
            TemplateError::Unavailable => "tikzcell::template::unavailable",
            TemplateError::Syntax { .. } => "tikzcell::template::syntax",
            TemplateError::Variables { .. } => "tikzcell::template::variables",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.err {
            TemplateError::Unavailable => None,
            TemplateError::Syntax { .. } => Some(Box::new(
                "define missing variables with `--var KEY=VALUE` or `--vars <FILE>`",
            )),
            TemplateError::Variables { .. } => Some(Box::new(
                "a variables file is a TOML table, e.g. `radius = 1.5`",
            )),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = line_span(self.src, self.err.line()?)?;
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("error in this line".to_string()),
            span,
        ))))
    }
}

/// Adapter for [`TikzcellError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a TikzcellError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TikzcellError::Io(_) => "tikzcell::io",
            TikzcellError::Options(err) => err.code(),
            TikzcellError::Template { .. } => "tikzcell::template",
            TikzcellError::Compile(_) => "tikzcell::compile",
            TikzcellError::NoTikzPicture => "tikzcell::save::no_tikzpicture",
            TikzcellError::Config(_) => "tikzcell::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TikzcellError::Options(err) => err.help()?,
            TikzcellError::Compile(CompileError::Failed { .. }) => {
                "rerun with `--full-err` for the complete log, or `--keep-temp` to inspect the files"
            }
            TikzcellError::Compile(CompileError::Spawn { .. }) => {
                "check `tex_program` and `pdftocairo` in the configuration, or set TIKZCELL_PDFTOCAIROPATH"
            }
            TikzcellError::NoTikzPicture => {
                "the code needs a \\begin{tikzpicture}...\\end{tikzpicture} environment"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a template diagnostic or a plain error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A template error with source location information.
    Template(TemplateDiagnostic<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Template(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Template(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Template(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Template(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Template(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Template(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Byte span of the 1-based `line` in `src`, without its line ending.
fn line_span(src: &str, line: usize) -> Option<SourceSpan> {
    let mut offset = 0;
    for (index, text) in src.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let len = text.trim_end_matches(['\n', '\r']).len();
            return Some(SourceSpan::new(offset.into(), len));
        }
        offset += text.len();
    }
    None
}

/// Convert a [`TikzcellError`] into a list of reportable errors.
pub fn to_reportables(err: &TikzcellError) -> Vec<Reportable<'_>> {
    match err {
        TikzcellError::Template { err, src } => {
            vec![Reportable::Template(TemplateDiagnostic::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
