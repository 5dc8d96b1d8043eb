//! Configuration types for tikzcell rendering.
//!
//! This module provides the configuration passed explicitly to the
//! [`DocumentBuilder`](crate::DocumentBuilder). All types implement
//! [`serde::Deserialize`] for loading from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`CompilerConfig`] - External programs used to compile and convert.
//! - [`OutputConfig`] - Image format, resolution and save location.
//! - [`TemplateConfig`] - Where template includes are resolved.
//!
//! # Example
//!
//! ```
//! # use tikzcell::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [compiler]
//!     tex_program = "lualatex"
//!
//!     [output]
//!     dpi = 300
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.compiler().tex_program(), "lualatex");
//! assert_eq!(config.compiler().pdftocairo(), "pdftocairo");
//! assert_eq!(config.output().dpi(), 300);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// External program settings.
    #[serde(default)]
    compiler: CompilerConfig,

    /// Output settings.
    #[serde(default)]
    output: OutputConfig,

    /// Template settings.
    #[serde(default)]
    template: TemplateConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(compiler: CompilerConfig, output: OutputConfig, template: TemplateConfig) -> Self {
        Self {
            compiler,
            output,
            template,
        }
    }

    /// Returns the compiler configuration.
    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    /// Returns a mutable reference to the compiler configuration.
    pub fn compiler_mut(&mut self) -> &mut CompilerConfig {
        &mut self.compiler
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns a mutable reference to the output configuration.
    pub fn output_mut(&mut self) -> &mut OutputConfig {
        &mut self.output
    }

    /// Returns the template configuration.
    pub fn template(&self) -> &TemplateConfig {
        &self.template
    }
}

/// External programs used for compilation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// TeX engine, e.g. `pdflatex`, `xelatex` or `lualatex`.
    tex_program: String,

    /// Extra arguments for the TeX engine, split shell-style.
    tex_args: Option<String>,

    /// Path or name of the `pdftocairo` executable.
    pdftocairo: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            tex_program: "pdflatex".to_string(),
            tex_args: None,
            pdftocairo: "pdftocairo".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Returns the TeX engine.
    pub fn tex_program(&self) -> &str {
        &self.tex_program
    }

    /// Returns the extra TeX engine arguments.
    pub fn tex_args(&self) -> Option<&str> {
        self.tex_args.as_deref()
    }

    /// Returns the `pdftocairo` executable.
    pub fn pdftocairo(&self) -> &str {
        &self.pdftocairo
    }

    /// Sets the TeX engine.
    pub fn set_tex_program(&mut self, tex_program: impl Into<String>) {
        self.tex_program = tex_program.into();
    }

    /// Sets the extra TeX engine arguments.
    pub fn set_tex_args(&mut self, tex_args: impl Into<String>) {
        self.tex_args = Some(tex_args.into());
    }

    /// Sets the `pdftocairo` executable.
    pub fn set_pdftocairo(&mut self, pdftocairo: impl Into<String>) {
        self.pdftocairo = pdftocairo.into();
    }
}

/// Output image and save location settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Resolution used when rasterizing.
    dpi: u32,

    /// Produce PNG instead of SVG.
    rasterize: bool,

    /// Produce a grayscale PNG.
    grayscale: bool,

    /// Directory that relative save destinations are placed in.
    save_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dpi: 96,
            rasterize: false,
            grayscale: false,
            save_dir: None,
        }
    }
}

impl OutputConfig {
    /// Returns the rasterization resolution.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Returns `true` when PNG output is configured.
    pub fn rasterize(&self) -> bool {
        self.rasterize
    }

    /// Returns `true` when grayscale PNG output is configured.
    pub fn grayscale(&self) -> bool {
        self.grayscale
    }

    /// Returns the save directory, if any.
    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    /// Sets the save directory.
    pub fn set_save_dir(&mut self, save_dir: impl Into<PathBuf>) {
        self.save_dir = Some(save_dir.into());
    }
}

/// Template rendering settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory searched by `{% include %}` and `{% extends %}`.
    search_path: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            search_path: PathBuf::from("."),
        }
    }
}

impl TemplateConfig {
    /// Returns the template search directory.
    pub fn search_path(&self) -> &Path {
        &self.search_path
    }
}
