//! Tikzcell Core Types and Definitions
//!
//! This crate turns a TikZ or LaTeX fragment plus a set of rendering options
//! into a complete, compilable `standalone` document. It performs no I/O.
//!
//! - **Options**: Raw option bags and their normalized form ([`options`] module)
//! - **Preamble**: Declaration lines between `\documentclass` and `\begin{document}` ([`preamble`] module)
//! - **Document**: Final document assembly and TikZ extraction ([`document`] module)
//! - **Errors**: Validation failures ([`error::OptionsError`])
//!
//! # Example
//!
//! ```
//! use tikzcell_core::{OptionRequest, assemble, build_preamble, validate};
//!
//! let request = OptionRequest {
//!     input_type: Some("tikz".to_string()),
//!     ..OptionRequest::default()
//! };
//! let options = validate(&request).unwrap();
//! let preamble = build_preamble(&options);
//! let document = assemble(r"\draw (0,0) -- (1,1);", &options, &preamble);
//!
//! assert!(document.contains(r"        \draw (0,0) -- (1,1);"));
//! ```

pub mod document;
pub mod error;
pub mod options;
pub mod preamble;

pub use document::{assemble, extract_tikzpicture};
pub use error::OptionsError;
pub use options::{OptionRequest, RenderOptions, WrapMode, validate};
pub use preamble::build_preamble;
