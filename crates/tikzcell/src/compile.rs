//! Compilation of assembled documents into images.
//!
//! A [`Compiler`] runs the configured TeX engine on a [`TexDocument`] and
//! converts the resulting PDF with `pdftocairo`. Every compilation happens in
//! its own temporary directory, with files named after the document's
//! content hash, so concurrent compilations never share files.

use std::{
    fs, io,
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{config::CompilerConfig, document::TexDocument};

/// Lines of compiler output kept in errors unless the full log is requested.
const LOG_TAIL_LINES: usize = 20;

/// Errors raised while compiling a document.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` failed ({status})\n{log}")]
    Failed {
        program: String,
        status: ExitStatus,
        log: String,
    },

    #[error("invalid TeX arguments: {0}")]
    InvalidArgs(String),

    #[error("I/O error in compilation directory: {0}")]
    Io(#[from] io::Error),
}

/// Output image format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Per-compilation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    format: ImageFormat,
    dpi: u32,
    grayscale: bool,
    full_err: bool,
    keep_temp: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            dpi: 96,
            grayscale: false,
            full_err: false,
            keep_temp: false,
        }
    }
}

impl CompileOptions {
    /// Sets the output format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the rasterization resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Produce a grayscale PNG instead of a transparent one.
    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Keep the whole compiler log in errors.
    pub fn with_full_err(mut self, full_err: bool) -> Self {
        self.full_err = full_err;
        self
    }

    /// Keep the temporary compilation directory.
    pub fn with_keep_temp(mut self, keep_temp: bool) -> Self {
        self.keep_temp = keep_temp;
        self
    }

    /// Returns the output format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

/// The result of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompiledImage {
    format: ImageFormat,
    image: Vec<u8>,
    pdf: Vec<u8>,
}

impl CompiledImage {
    /// Returns the image format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the encoded image.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Returns the intermediate PDF.
    pub fn pdf(&self) -> &[u8] {
        &self.pdf
    }
}

/// Runs the TeX engine and `pdftocairo`.
#[derive(Debug, Clone)]
pub struct Compiler {
    tex_program: String,
    tex_args: Vec<String>,
    pdftocairo: String,
}

impl Compiler {
    /// Creates a compiler from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidArgs`] if the configured TeX arguments
    /// cannot be split (e.g. an unbalanced quote).
    pub fn new(config: &CompilerConfig) -> Result<Self, CompileError> {
        let tex_args = config
            .tex_args()
            .map(shell_words::split)
            .transpose()
            .map_err(|err| CompileError::InvalidArgs(err.to_string()))?
            .unwrap_or_default();

        Ok(Self {
            tex_program: config.tex_program().to_string(),
            tex_args,
            pdftocairo: config.pdftocairo().to_string(),
        })
    }

    /// Compiles `document` into an image.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if either program cannot be launched or
    /// exits unsuccessfully, or if the work directory cannot be used.
    pub fn compile(
        &self,
        document: &TexDocument,
        options: &CompileOptions,
    ) -> Result<CompiledImage, CompileError> {
        let work_dir = tempfile::Builder::new().prefix("tikzcell-").tempdir()?;
        let stem = document.file_stem();

        info!(stem = stem.as_str(), tex_program = self.tex_program.as_str(); "Compiling document");
        let result = self.compile_in(work_dir.path(), &stem, document, options);

        if options.keep_temp {
            let kept = work_dir.keep();
            warn!(path:% = kept.display(); "Keeping temporary files");
        }

        result
    }

    /// Arguments for the TeX engine: the configured extras, then
    /// `-interaction=nonstopmode`, then the input file.
    fn tex_arguments<'a>(&'a self, tex_file: &'a str) -> impl Iterator<Item = &'a str> {
        self.tex_args
            .iter()
            .map(String::as_str)
            .chain(["-interaction=nonstopmode", tex_file])
    }

    fn compile_in(
        &self,
        dir: &Path,
        stem: &str,
        document: &TexDocument,
        options: &CompileOptions,
    ) -> Result<CompiledImage, CompileError> {
        let tex_file = format!("{stem}.tex");
        let pdf_file = format!("{stem}.pdf");
        fs::write(dir.join(&tex_file), document.full_latex())?;

        // TeX engine: fragment -> PDF
        let mut tex = Command::new(&self.tex_program);
        tex.args(self.tex_arguments(&tex_file));
        run(tex, &self.tex_program, dir, options.full_err)?;

        // pdftocairo: PDF -> image

        let mut cairo = Command::new(&self.pdftocairo);
        match options.format {
            ImageFormat::Svg => {
                cairo.arg("-svg").arg(&pdf_file).arg(format!("{stem}.svg"));
            }
            ImageFormat::Png => {
                let background = if options.grayscale { "-gray" } else { "-transp" };
                cairo
                    .args(["-png", "-singlefile", background, "-r"])
                    .arg(options.dpi.to_string())
                    .arg(&pdf_file)
                    .arg(stem);
            }
        }
        run(cairo, &self.pdftocairo, dir, options.full_err)?;

        let image_file = format!("{stem}.{}", options.format.extension());
        let image = fs::read(dir.join(image_file))?;
        let pdf = fs::read(dir.join(pdf_file))?;

        info!(format:? = options.format, bytes = image.len(); "Image produced");
        Ok(CompiledImage {
            format: options.format,
            image,
            pdf,
        })
    }
}

fn run(
    mut command: Command,
    program: &str,
    dir: &Path,
    full_err: bool,
) -> Result<(), CompileError> {
    debug!(command:? = command; "Running external program");

    let output = command
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| CompileError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        return Ok(());
    }

    // Some engines only write to stdout
    let stream = if output.stderr.is_empty() {
        &output.stdout
    } else {
        &output.stderr
    };
    let log = String::from_utf8_lossy(stream);
    let log = if full_err {
        log.into_owned()
    } else {
        tail(&log, LOG_TAIL_LINES)
    };

    Err(CompileError::Failed {
        program: program.to_string(),
        status: output.status,
        log,
    })
}

/// Returns the last `n` lines of `text`.
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
