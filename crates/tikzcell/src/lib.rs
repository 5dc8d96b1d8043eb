//! Tikzcell - Render TikZ and LaTeX fragments to images.
//!
//! A fragment passes through option validation, an optional template pass,
//! document assembly, TeX compilation and PDF conversion. The pure parts
//! live in [`tikzcell_core`]; this crate adds the template engine, the
//! external programs and file output.

pub mod compile;
pub mod config;
pub mod save;
pub mod template;

mod document;
mod error;

pub use tikzcell_core::{OptionRequest, OptionsError, RenderOptions, WrapMode};

pub use compile::{CompileOptions, CompiledImage, ImageFormat};
pub use document::TexDocument;
pub use error::TikzcellError;
pub use template::{Namespace, TemplateError};

use std::path::{Path, PathBuf};

use log::{debug, info, trace};

use compile::Compiler;
use config::AppConfig;

/// Builder for preparing and compiling tikzcell documents.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use tikzcell::{DocumentBuilder, OptionRequest, config::AppConfig};
///
/// let builder = DocumentBuilder::new(AppConfig::default());
///
/// let request = OptionRequest {
///     implicit_pic: true,
///     tikz_libraries: Some("calc".to_string()),
///     ..OptionRequest::default()
/// };
///
/// // Assemble the document without compiling
/// let document = builder.prepare(r"\draw (0,0) -- (1,1);", &request, None)
///     .expect("Failed to prepare");
/// println!("{}", document.full_latex());
///
/// // Compile it and save the image
/// let image = builder.compile(&document, &builder.compile_options())
///     .expect("Failed to compile");
/// builder.save_image(&image, Path::new("figure"))
///     .expect("Failed to save");
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    config: AppConfig,
}

impl DocumentBuilder {
    /// Create a new document builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validate options, run the template pass and assemble the document.
    ///
    /// The template pass runs only when `namespace` is provided. Options are
    /// validated first so that no template is rendered for an invalid request.
    ///
    /// # Errors
    ///
    /// Returns `TikzcellError::Options` for invalid option combinations and
    /// `TikzcellError::Template` for template failures.
    pub fn prepare(
        &self,
        source: &str,
        request: &OptionRequest,
        namespace: Option<&Namespace>,
    ) -> Result<TexDocument, TikzcellError> {
        info!("Preparing document");

        // Options first: an invalid request never reaches the template engine
        let options = tikzcell_core::validate(request)?;

        let source = match namespace {
            Some(namespace) => {
                template::render_template(source, namespace, self.config.template().search_path())
                    .map_err(|err| TikzcellError::new_template_error(err, source))?
            }
            None => source.to_string(),
        };

        let document = TexDocument::new(source, &options);

        debug!(
            wrap_mode:% = document.wrap_mode(),
            custom_preamble = options.preamble_override().is_some();
            "Document assembled"
        );
        trace!(full_latex = document.full_latex(); "Assembled LaTeX");

        Ok(document)
    }

    /// Compile options derived from the output configuration.
    pub fn compile_options(&self) -> CompileOptions {
        let output = self.config.output();
        let format = if output.rasterize() {
            ImageFormat::Png
        } else {
            ImageFormat::Svg
        };

        CompileOptions::default()
            .with_format(format)
            .with_dpi(output.dpi())
            .with_grayscale(output.grayscale())
    }

    /// Compile a prepared document into an image.
    ///
    /// # Errors
    ///
    /// Returns `TikzcellError::Compile` if the TeX engine or `pdftocairo`
    /// cannot be run or fails.
    pub fn compile(
        &self,
        document: &TexDocument,
        options: &CompileOptions,
    ) -> Result<CompiledImage, TikzcellError> {
        let compiler = Compiler::new(self.config.compiler())?;
        let image = compiler.compile(document, options)?;
        info!("Document compiled successfully");
        Ok(image)
    }

    /// Save the full LaTeX document.
    ///
    /// # Errors
    ///
    /// Returns `TikzcellError::Io` if the file cannot be written.
    pub fn save_tex(&self, document: &TexDocument, dest: &Path) -> Result<PathBuf, TikzcellError> {
        self.save(dest, "tex", document.full_latex().as_bytes())
    }

    /// Save the first `tikzpicture` environment of the document.
    ///
    /// # Errors
    ///
    /// Returns `TikzcellError::NoTikzPicture` if the document has no
    /// `tikzpicture` environment, or `TikzcellError::Io` if the file cannot
    /// be written.
    pub fn save_tikz(
        &self,
        document: &TexDocument,
        dest: &Path,
    ) -> Result<PathBuf, TikzcellError> {
        let code = document.tikz_code().ok_or(TikzcellError::NoTikzPicture)?;
        self.save(dest, "tikz", code.as_bytes())
    }

    /// Save the intermediate PDF of a compiled image.
    ///
    /// # Errors
    ///
    /// Returns `TikzcellError::Io` if the file cannot be written.
    pub fn save_pdf(&self, image: &CompiledImage, dest: &Path) -> Result<PathBuf, TikzcellError> {
        self.save(dest, "pdf", image.pdf())
    }

    /// Save a compiled image, using the extension of its format.
    ///
    /// # Errors
    ///
    /// Returns `TikzcellError::Io` if the file cannot be written.
    pub fn save_image(
        &self,
        image: &CompiledImage,
        dest: &Path,
    ) -> Result<PathBuf, TikzcellError> {
        self.save(dest, image.format().extension(), image.image())
    }

    fn save(&self, dest: &Path, ext: &str, contents: &[u8]) -> Result<PathBuf, TikzcellError> {
        let path = save::save(dest, ext, contents, self.config.output().save_dir())?;
        Ok(path)
    }
}
