//! Rendering options and their validation.
//!
//! Hosts collect options in an [`OptionRequest`], which may still contain
//! legacy aliases and contradictory flags. [`validate`] reduces it to a
//! single canonical [`RenderOptions`] value that every downstream component
//! consumes.
//!
//! # Example
//!
//! ```
//! use tikzcell_core::{OptionRequest, OptionsError, WrapMode, validate};
//!
//! let request = OptionRequest {
//!     implicit_pic: true,
//!     scale: Some(2.0),
//!     ..OptionRequest::default()
//! };
//! let options = validate(&request).unwrap();
//! assert_eq!(options.wrap_mode(), WrapMode::TikzPicture);
//! assert!(options.has_scale());
//!
//! let request = OptionRequest {
//!     preamble: Some(r"\usepackage{tikz}".to_string()),
//!     tex_packages: Some("amsmath".to_string()),
//!     ..OptionRequest::default()
//! };
//! assert_eq!(validate(&request), Err(OptionsError::ConflictingPreamble));
//! ```

use std::{fmt, str::FromStr};

use log::debug;

use crate::error::OptionsError;

/// Scale factor that leaves the picture untouched.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Strategy for turning a fragment into a complete document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// The fragment already is a complete document and passes through unchanged.
    FullDocument,
    /// The fragment is a document body and gets the `standalone` scaffold.
    #[default]
    StandaloneDocument,
    /// The fragment is the inside of a `tikzpicture` environment.
    TikzPicture,
}

impl WrapMode {
    /// All modes, in the order their names are matched.
    pub const ALL: [WrapMode; 3] = [
        WrapMode::FullDocument,
        WrapMode::StandaloneDocument,
        WrapMode::TikzPicture,
    ];

    /// Returns the canonical name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullDocument => "full-document",
            Self::StandaloneDocument => "standalone-document",
            Self::TikzPicture => "tikzpicture",
        }
    }

    /// Resolves a selector that is a case-insensitive prefix of exactly one
    /// canonical mode name.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::UnknownWrapMode`] when the selector is empty,
    /// matches no mode, or matches more than one.
    pub fn from_prefix(selector: &str) -> Result<Self, OptionsError> {
        let needle = selector.to_lowercase();
        let mut matches = Self::ALL
            .iter()
            .filter(|mode| !needle.is_empty() && mode.as_str().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(mode), None) => Ok(*mode),
            _ => Err(OptionsError::UnknownWrapMode {
                selector: selector.to_string(),
            }),
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WrapMode {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_prefix(s)
    }
}

/// Raw options as a host collects them, before normalization.
///
/// `input_type` is the current way of choosing the wrap mode; `implicit_pic`
/// and `full_document` are the older boolean aliases for two of its values.
/// Empty or whitespace-only strings count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionRequest {
    /// Wrap mode selector, matched by case-insensitive prefix.
    pub input_type: Option<String>,
    /// Legacy alias for `input_type = "tikzpicture"`.
    pub implicit_pic: bool,
    /// Legacy alias for `input_type = "full-document"`.
    pub full_document: bool,
    /// Scale factor applied with `\scalebox`.
    pub scale: Option<f64>,
    /// Preamble used verbatim instead of the built one.
    pub preamble: Option<String>,
    /// Comma-separated list of LaTeX packages.
    pub tex_packages: Option<String>,
    /// Comma-separated list of TikZ libraries.
    pub tikz_libraries: Option<String>,
    /// Comma-separated list of pgfplots libraries.
    pub pgfplots_libraries: Option<String>,
    /// Do not declare the `tikz` package.
    pub no_tikz: bool,
}

/// Normalized, validated rendering options.
///
/// Only [`validate`] produces non-default values, so every instance obeys
/// the option invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    wrap_mode: WrapMode,
    scale: f64,
    preamble_override: Option<String>,
    packages: Option<String>,
    tikz_libraries: Option<String>,
    pgfplots_libraries: Option<String>,
    suppress_base_package: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            wrap_mode: WrapMode::default(),
            scale: DEFAULT_SCALE,
            preamble_override: None,
            packages: None,
            tikz_libraries: None,
            pgfplots_libraries: None,
            suppress_base_package: false,
        }
    }
}

impl RenderOptions {
    /// Returns the resolved wrap mode.
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Returns the scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns `true` when a `\scalebox` wrapper is required.
    pub fn has_scale(&self) -> bool {
        self.scale != DEFAULT_SCALE
    }

    /// Returns the custom preamble, if one replaces the built preamble.
    pub fn preamble_override(&self) -> Option<&str> {
        self.preamble_override.as_deref()
    }

    /// Returns the comma-separated package list.
    pub fn packages(&self) -> Option<&str> {
        self.packages.as_deref()
    }

    /// Returns the comma-separated TikZ library list.
    pub fn tikz_libraries(&self) -> Option<&str> {
        self.tikz_libraries.as_deref()
    }

    /// Returns the comma-separated pgfplots library list.
    pub fn pgfplots_libraries(&self) -> Option<&str> {
        self.pgfplots_libraries.as_deref()
    }

    /// Returns `true` when the `tikz` package declaration is omitted.
    pub fn suppress_base_package(&self) -> bool {
        self.suppress_base_package
    }

    fn has_extras(&self) -> bool {
        self.packages.is_some()
            || self.tikz_libraries.is_some()
            || self.pgfplots_libraries.is_some()
    }
}

/// Normalizes a raw [`OptionRequest`] into [`RenderOptions`].
///
/// # Errors
///
/// - [`OptionsError::ConflictingPreamble`] if a preamble is combined with
///   packages or libraries.
/// - [`OptionsError::ConflictingWrapMode`] if the legacy flags and the
///   selector disagree.
/// - [`OptionsError::UnknownWrapMode`] if the selector matches no single mode.
/// - [`OptionsError::InvalidScale`] if the scale is not a positive number.
/// - [`OptionsError::FullDocumentOptions`] if a full document is combined
///   with scale, preamble, package, library or `no_tikz` options.
pub fn validate(request: &OptionRequest) -> Result<RenderOptions, OptionsError> {
    let options = RenderOptions {
        wrap_mode: resolve_wrap_mode(request)?,
        scale: request.scale.unwrap_or(DEFAULT_SCALE),
        preamble_override: present(&request.preamble),
        packages: present(&request.tex_packages),
        tikz_libraries: present(&request.tikz_libraries),
        pgfplots_libraries: present(&request.pgfplots_libraries),
        suppress_base_package: request.no_tikz,
    };

    if options.preamble_override.is_some() && options.has_extras() {
        return Err(OptionsError::ConflictingPreamble);
    }

    if !options.scale.is_finite() || options.scale <= 0.0 {
        return Err(OptionsError::InvalidScale {
            scale: options.scale,
        });
    }

    if options.wrap_mode == WrapMode::FullDocument
        && (options.has_scale()
            || options.has_extras()
            || options.preamble_override.is_some()
            || options.suppress_base_package)
    {
        return Err(OptionsError::FullDocumentOptions);
    }

    debug!(wrap_mode:% = options.wrap_mode, scale = options.scale; "Options validated");
    Ok(options)
}

fn resolve_wrap_mode(request: &OptionRequest) -> Result<WrapMode, OptionsError> {
    let legacy = match (request.implicit_pic, request.full_document) {
        (true, true) => return Err(OptionsError::ConflictingWrapMode),
        (true, false) => Some(WrapMode::TikzPicture),
        (false, true) => Some(WrapMode::FullDocument),
        (false, false) => None,
    };

    let selected = request
        .input_type
        .as_deref()
        .map(WrapMode::from_prefix)
        .transpose()?;

    match (legacy, selected) {
        (Some(legacy), Some(selected)) if legacy != selected => {
            Err(OptionsError::ConflictingWrapMode)
        }
        (Some(mode), _) | (None, Some(mode)) => Ok(mode),
        (None, None) => Ok(WrapMode::default()),
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_mode(input_type: &str) -> OptionRequest {
        OptionRequest {
            input_type: Some(input_type.to_string()),
            ..OptionRequest::default()
        }
    }

    #[test]
    fn test_prefix_resolution() {
        assert_eq!(
            WrapMode::from_prefix("stand"),
            Ok(WrapMode::StandaloneDocument)
        );
        assert_eq!(WrapMode::from_prefix("s"), Ok(WrapMode::StandaloneDocument));
        assert_eq!(WrapMode::from_prefix("F"), Ok(WrapMode::FullDocument));
        assert_eq!(WrapMode::from_prefix("TikZ"), Ok(WrapMode::TikzPicture));
        assert_eq!(
            WrapMode::from_prefix("tikzpicture"),
            Ok(WrapMode::TikzPicture)
        );
    }

    #[test]
    fn test_unknown_selectors() {
        for selector in ["banana", "", "tikzpictures", "standalone-fragment"] {
            assert_eq!(
                WrapMode::from_prefix(selector),
                Err(OptionsError::UnknownWrapMode {
                    selector: selector.to_string()
                }),
                "selector {selector:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_wrap_mode_round_trips_through_name() {
        for mode in WrapMode::ALL {
            assert_eq!(mode.to_string().parse::<WrapMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_defaults() {
        let options = validate(&OptionRequest::default()).unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(options.wrap_mode(), WrapMode::StandaloneDocument);
        assert!(!options.has_scale());
    }

    #[test]
    fn test_legacy_flags() {
        let implicit = OptionRequest {
            implicit_pic: true,
            ..OptionRequest::default()
        };
        assert_eq!(
            validate(&implicit).unwrap().wrap_mode(),
            WrapMode::TikzPicture
        );

        let full = OptionRequest {
            full_document: true,
            ..OptionRequest::default()
        };
        assert_eq!(validate(&full).unwrap().wrap_mode(), WrapMode::FullDocument);
    }

    #[test]
    fn test_both_legacy_flags_conflict() {
        let request = OptionRequest {
            implicit_pic: true,
            full_document: true,
            ..OptionRequest::default()
        };
        assert_eq!(validate(&request), Err(OptionsError::ConflictingWrapMode));
    }

    #[test]
    fn test_legacy_flag_disagreeing_with_selector() {
        let request = OptionRequest {
            implicit_pic: true,
            ..request_with_mode("standalone")
        };
        assert_eq!(validate(&request), Err(OptionsError::ConflictingWrapMode));

        let request = OptionRequest {
            full_document: true,
            ..request_with_mode("t")
        };
        assert_eq!(validate(&request), Err(OptionsError::ConflictingWrapMode));
    }

    #[test]
    fn test_legacy_flag_agreeing_with_selector() {
        let request = OptionRequest {
            implicit_pic: true,
            ..request_with_mode("tikz")
        };
        assert_eq!(
            validate(&request).unwrap().wrap_mode(),
            WrapMode::TikzPicture
        );
    }

    #[test]
    fn test_unknown_selector_is_reported() {
        assert_eq!(
            validate(&request_with_mode("banana")),
            Err(OptionsError::UnknownWrapMode {
                selector: "banana".to_string()
            })
        );
    }

    #[test]
    fn test_preamble_conflicts_with_each_list() {
        let base = OptionRequest {
            preamble: Some("custom".to_string()),
            ..OptionRequest::default()
        };
        let variants = [
            OptionRequest {
                tex_packages: Some("a,b".to_string()),
                ..base.clone()
            },
            OptionRequest {
                tikz_libraries: Some("c,d".to_string()),
                ..base.clone()
            },
            OptionRequest {
                pgfplots_libraries: Some("e,f".to_string()),
                ..base.clone()
            },
        ];

        for request in &variants {
            assert_eq!(validate(request), Err(OptionsError::ConflictingPreamble));
        }
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let request = OptionRequest {
            preamble: Some("custom".to_string()),
            tex_packages: Some(String::new()),
            tikz_libraries: Some("   ".to_string()),
            ..OptionRequest::default()
        };
        let options = validate(&request).unwrap();
        assert_eq!(options.preamble_override(), Some("custom"));
        assert_eq!(options.packages(), None);
        assert_eq!(options.tikz_libraries(), None);
    }

    #[test]
    fn test_invalid_scale() {
        for scale in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let request = OptionRequest {
                scale: Some(scale),
                ..OptionRequest::default()
            };
            assert!(
                matches!(validate(&request), Err(OptionsError::InvalidScale { .. })),
                "scale {scale} should be rejected"
            );
        }
    }

    #[test]
    fn test_full_document_rejects_extras() {
        let base = request_with_mode("full");
        let variants = [
            OptionRequest {
                scale: Some(2.0),
                ..base.clone()
            },
            OptionRequest {
                tex_packages: Some("amsmath".to_string()),
                ..base.clone()
            },
            OptionRequest {
                preamble: Some("custom".to_string()),
                ..base.clone()
            },
            OptionRequest {
                no_tikz: true,
                ..base.clone()
            },
        ];

        for request in &variants {
            assert_eq!(validate(request), Err(OptionsError::FullDocumentOptions));
        }
    }

    #[test]
    fn test_full_document_accepts_unit_scale() {
        let request = OptionRequest {
            scale: Some(1.0),
            ..request_with_mode("full-document")
        };
        assert_eq!(
            validate(&request).unwrap().wrap_mode(),
            WrapMode::FullDocument
        );
    }
}
