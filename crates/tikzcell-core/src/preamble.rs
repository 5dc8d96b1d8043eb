//! Preamble construction.
//!
//! The preamble is the block of declarations between `\documentclass` and
//! `\begin{document}`. It is either a caller-supplied override or built from
//! the package and library lists in a fixed order:
//!
//! 1. `\usepackage{graphicx}` when a scale factor is set and the package
//!    list does not load it already
//! 2. `\usepackage{tikz}` unless the base package is suppressed
//! 3. `\usepackage{<packages>}`
//! 4. `\usetikzlibrary{<tikz libraries>}`
//! 5. `\usepgfplotslibrary{<pgfplots libraries>}`

use crate::options::RenderOptions;

/// Package providing `\scalebox`.
pub const SCALING_PACKAGE: &str = "graphicx";

/// Package enabling TikZ drawing.
pub const BASE_PACKAGE: &str = "tikz";

/// Builds the preamble for the given options.
///
/// Every emitted line ends with a single newline; when no line applies the
/// result is empty. The output depends only on `options`.
pub fn build_preamble(options: &RenderOptions) -> String {
    if let Some(custom) = options.preamble_override() {
        return custom_preamble(custom, options.has_scale());
    }

    // graphicx is declared once, even when the package list already loads it
    let needs_scaling_package = options.has_scale()
        && !options
            .packages()
            .is_some_and(|packages| lists_package(packages, SCALING_PACKAGE));

    let declarations = [
        needs_scaling_package.then(|| declaration("usepackage", SCALING_PACKAGE)),
        (!options.suppress_base_package())
            .then(|| declaration("usepackage", BASE_PACKAGE)),
        options
            .packages()
            .map(|packages| declaration("usepackage", packages)),
        options
            .tikz_libraries()
            .map(|libraries| declaration("usetikzlibrary", libraries)),
        options
            .pgfplots_libraries()
            .map(|libraries| declaration("usepgfplotslibrary", libraries)),
    ];

    declarations.into_iter().flatten().collect()
}

fn declaration(command: &str, argument: &str) -> String {
    format!("\\{command}{{{argument}}}\n")
}

/// Normalizes a custom preamble and makes sure `\scalebox` is available.
fn custom_preamble(custom: &str, has_scale: bool) -> String {
    let custom = custom.trim();
    let mut preamble = String::with_capacity(custom.len() + 32);

    if has_scale && !declares_package(custom, SCALING_PACKAGE) {
        preamble.push_str(&declaration("usepackage", SCALING_PACKAGE));
    }
    if !custom.is_empty() {
        preamble.push_str(custom);
        preamble.push('\n');
    }
    preamble
}

/// Returns `true` if any `\usepackage` line of `preamble` loads `package`.
///
/// Handles optional arguments (`\usepackage[draft]{graphicx}`) and
/// comma-separated lists (`\usepackage{amsmath, graphicx}`).
fn declares_package(preamble: &str, package: &str) -> bool {
    preamble.lines().any(|line| {
        let Some(rest) = line.trim_start().strip_prefix("\\usepackage") else {
            return false;
        };
        let Some(open) = rest.find('{') else {
            return false;
        };
        let Some(close) = rest[open..].find('}') else {
            return false;
        };
        lists_package(&rest[open + 1..open + close], package)
    })
}

/// Returns `true` if the comma-separated `list` names `package`.
fn lists_package(list: &str, package: &str) -> bool {
    list.split(',').any(|name| name.trim() == package)
}
