//! Template pass over the user's source.
//!
//! Sources may embed Jinja-style variables, loops and includes that are
//! expanded before the document is assembled. The engine is
//! [`minijinja`], available through the default `jinja` feature; without it
//! every render fails with [`TemplateError::Unavailable`].

use std::path::Path;

use thiserror::Error;

/// Variables visible to the template.
pub type Namespace = toml::Table;

/// Errors raised by the template pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("template engine unavailable: rebuild with the `jinja` feature")]
    Unavailable,

    #[error("template error: {message}")]
    Syntax {
        message: String,
        /// 1-based line of the error in the template source, if known.
        line: Option<usize>,
    },

    #[error("invalid template variables: {message}")]
    Variables {
        message: String,
        /// 1-based line of the error in the variables file, if known.
        line: Option<usize>,
    },
}

impl TemplateError {
    /// Returns the 1-based line the error points at, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Unavailable => None,
            Self::Syntax { line, .. } | Self::Variables { line, .. } => *line,
        }
    }
}

/// Parses template variables from a TOML table.
///
/// ```
/// use tikzcell::template::parse_namespace;
///
/// let namespace = parse_namespace("radius = 1.5\ncolor = \"blue\"").unwrap();
/// assert_eq!(namespace.len(), 2);
/// assert!(parse_namespace("radius =").is_err());
/// ```
///
/// # Errors
///
/// Returns [`TemplateError::Variables`] if `text` is not a TOML table.
pub fn parse_namespace(text: &str) -> Result<Namespace, TemplateError> {
    toml::from_str(text).map_err(|err| TemplateError::Variables {
        message: err.message().to_string(),
        line: err
            .span()
            .and_then(|span| text.get(..span.start))
            .map(|head| head.matches('\n').count() + 1),
    })
}

/// Renders `text` with the variables in `namespace`.
///
/// Includes and inheritance resolve relative to `search_path`. Undefined
/// variables are errors rather than empty strings.
///
/// # Errors
///
/// Returns [`TemplateError::Syntax`] for malformed templates, undefined
/// variables and failed includes.
#[cfg(feature = "jinja")]
pub fn render_template(
    text: &str,
    namespace: &Namespace,
    search_path: &Path,
) -> Result<String, TemplateError> {
    use log::debug;
    use minijinja::{Environment, UndefinedBehavior, Value};

    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader(search_path));
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    debug!(variables = namespace.len(); "Rendering template");

    env.render_str(text, Value::from_serialize(namespace))
        .map_err(|err| TemplateError::Syntax {
            message: err.to_string(),
            line: err.line(),
        })
}

/// Renders `text` with the variables in `namespace`.
///
/// # Errors
///
/// Always returns [`TemplateError::Unavailable`]: the crate was built
/// without the `jinja` feature.
#[cfg(not(feature = "jinja"))]
pub fn render_template(
    _text: &str,
    _namespace: &Namespace,
    _search_path: &Path,
) -> Result<String, TemplateError> {
    Err(TemplateError::Unavailable)
}

#[cfg(all(test, feature = "jinja"))]
mod tests {
    use std::fs;

    use super::*;

    fn namespace(entries: &[(&str, toml::Value)]) -> Namespace {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_substitutes_variables() {
        let ns = namespace(&[
            ("radius", toml::Value::Float(1.5)),
            ("color", toml::Value::String("blue".to_string())),
        ]);
        let rendered = render_template(
            r"\draw[fill={{ color }}] (0,0) circle ({{ radius }});",
            &ns,
            Path::new("."),
        )
        .unwrap();
        assert_eq!(rendered, r"\draw[fill=blue] (0,0) circle (1.5);");
    }

    #[test]
    fn test_loops_over_arrays() {
        let ns = namespace(&[(
            "xs",
            toml::Value::Array(vec![toml::Value::Integer(1), toml::Value::Integer(2)]),
        )]);
        let rendered = render_template(
            "{% for x in xs %}\\node at ({{ x }},0) {};\n{% endfor %}",
            &ns,
            Path::new("."),
        )
        .unwrap();
        assert_eq!(rendered, "\\node at (1,0) {};\n\\node at (2,0) {};\n");
    }

    #[test]
    fn test_includes_resolve_against_search_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("style.tex"),
            r"\tikzset{every node/.style=draw}",
        )
        .unwrap();

        let rendered = render_template(
            "{% include 'style.tex' %}\n\\node {A};",
            &Namespace::new(),
            dir.path(),
        )
        .unwrap();
        assert_eq!(rendered, "\\tikzset{every node/.style=draw}\n\\node {A};");
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let err =
            render_template("{{ missing }}", &Namespace::new(), Path::new(".")).unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = render_template("line one\n{% if %}", &Namespace::new(), Path::new("."))
            .unwrap_err();
        match err {
            TemplateError::Syntax { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("Expected Syntax, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod namespace_tests {
    use super::*;

    #[test]
    fn test_parse_namespace() {
        let namespace = parse_namespace("n = 3\nxs = [1, 2]\n").unwrap();
        assert_eq!(namespace.get("n"), Some(&toml::Value::Integer(3)));
        assert!(parse_namespace("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_variables_report_line() {
        let err = parse_namespace("n = 3\ncolor = ]\n").unwrap_err();
        assert!(matches!(err, TemplateError::Variables { .. }));
        assert_eq!(err.line(), Some(2));
    }
}
