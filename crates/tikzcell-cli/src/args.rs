//! Command-line argument definitions for the tikzcell CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input, shape the generated LaTeX
//! document, control compilation and choose where results are saved.

use std::path::PathBuf;

use clap::Parser;

use tikzcell::OptionRequest;

/// Command-line arguments for the tikzcell renderer
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input TeX/TikZ file, or `-` for stdin
    #[arg(help = "Path to the input file, or `-` to read stdin")]
    pub input: Option<String>,

    /// TeX/TikZ code given inline instead of an input file
    #[arg(long, conflicts_with = "input")]
    pub code: Option<String>,

    /// Type of the input: `full-document`, `standalone-document` or `tikzpicture`
    #[arg(long = "as", visible_alias = "input-type", value_name = "INPUT_TYPE")]
    pub input_type: Option<String>,

    /// Alias for `--as=tikzpicture`
    #[arg(short, long)]
    pub implicit_pic: bool,

    /// Alias for `--as=full-document`
    #[arg(short, long)]
    pub full_document: bool,

    /// LaTeX preamble to insert before the document
    #[arg(short = 'p', long)]
    pub latex_preamble: Option<String>,

    /// Comma-separated list of TeX packages, e.g. `amsfonts,amsmath`
    #[arg(short, long)]
    pub tex_packages: Option<String>,

    /// Do not import the TikZ package
    #[arg(long)]
    pub no_tikz: bool,

    /// Comma-separated list of TikZ libraries, e.g. `calc,arrows`
    #[arg(short = 'l', long)]
    pub tikz_libraries: Option<String>,

    /// Comma-separated list of pgfplots libraries, e.g. `groupplots,external`
    #[arg(long)]
    pub pgfplots_libraries: Option<String>,

    /// Render the code as a Jinja template
    #[arg(short = 'j', long)]
    pub use_jinja: bool,

    /// Template variable as KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// TOML file with template variables
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Print the rendered template
    #[arg(long, conflicts_with = "print_tex")]
    pub print_jinja: bool,

    /// Print the full LaTeX document
    #[arg(long)]
    pub print_tex: bool,

    /// Scale factor applied to the picture, e.g. `0.5`
    #[arg(long)]
    pub scale: Option<f64>,

    /// Output a rasterized image (PNG) instead of SVG
    #[arg(short, long)]
    pub rasterize: bool,

    /// DPI to use when rasterizing
    #[arg(short, long)]
    pub dpi: Option<u32>,

    /// Grayscale rasterized image
    #[arg(short, long)]
    pub gray: bool,

    /// Print the full compiler log when an error occurs
    #[arg(short = 'e', long)]
    pub full_err: bool,

    /// Keep temporary compilation files
    #[arg(short, long)]
    pub keep_temp: bool,

    /// TeX program used for compilation, e.g. `xelatex` or `lualatex`
    #[arg(long)]
    pub tex_program: Option<String>,

    /// Arguments passed to the TeX program
    #[arg(long, allow_hyphen_values = true)]
    pub tex_args: Option<String>,

    /// Do not compile, only assemble (and optionally print or save) the document
    #[arg(long)]
    pub no_compile: bool,

    /// Save the TikZ code to file
    #[arg(short = 's', long, value_name = "FILE")]
    pub save_tikz: Option<PathBuf>,

    /// Save the full LaTeX document to file
    #[arg(long, value_name = "FILE")]
    pub save_tex: Option<PathBuf>,

    /// Save the PDF to file
    #[arg(long, value_name = "FILE")]
    pub save_pdf: Option<PathBuf>,

    /// Path to the output image; the extension is added when missing
    #[arg(short, long, visible_alias = "save-image", default_value = "out")]
    pub output: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Collects the document options into a request for validation.
    pub fn option_request(&self) -> OptionRequest {
        OptionRequest {
            input_type: self.input_type.clone(),
            implicit_pic: self.implicit_pic,
            full_document: self.full_document,
            scale: self.scale,
            preamble: self.latex_preamble.clone(),
            tex_packages: self.tex_packages.clone(),
            tikz_libraries: self.tikz_libraries.clone(),
            pgfplots_libraries: self.pgfplots_libraries.clone(),
            no_tikz: self.no_tikz,
        }
    }

    /// Returns `true` when the source goes through the template pass.
    pub fn renders_template(&self) -> bool {
        self.use_jinja || self.print_jinja
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_arguments() {
        let args = Args::try_parse_from(["tikzcell", "figure.tikz"]).unwrap();
        assert_eq!(args.input.as_deref(), Some("figure.tikz"));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.log_level, "info");
        assert_eq!(args.option_request(), OptionRequest::default());
    }

    #[test]
    fn test_option_request_mapping() {
        let args = Args::try_parse_from([
            "tikzcell",
            "--code",
            "\\draw (0,0);",
            "--as",
            "tikz",
            "-t",
            "amsmath,amssymb",
            "-l",
            "calc",
            "--pgfplots-libraries",
            "groupplots",
            "--scale",
            "2",
            "--no-tikz",
        ])
        .unwrap();

        let request = args.option_request();
        assert_eq!(request.input_type.as_deref(), Some("tikz"));
        assert_eq!(request.tex_packages.as_deref(), Some("amsmath,amssymb"));
        assert_eq!(request.tikz_libraries.as_deref(), Some("calc"));
        assert_eq!(request.pgfplots_libraries.as_deref(), Some("groupplots"));
        assert_eq!(request.scale, Some(2.0));
        assert!(request.no_tikz);
    }

    #[test]
    fn test_input_type_alias() {
        let args =
            Args::try_parse_from(["tikzcell", "-", "--input-type", "full"]).unwrap();
        assert_eq!(args.input_type.as_deref(), Some("full"));
    }

    #[test]
    fn test_legacy_flags() {
        let args = Args::try_parse_from(["tikzcell", "-", "-i"]).unwrap();
        assert!(args.option_request().implicit_pic);

        let args = Args::try_parse_from(["tikzcell", "-", "-f"]).unwrap();
        assert!(args.option_request().full_document);
    }

    #[test]
    fn test_print_flags_conflict() {
        let result = Args::try_parse_from(["tikzcell", "-", "--print-jinja", "--print-tex"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_code_conflicts_with_input() {
        let result = Args::try_parse_from(["tikzcell", "file.tex", "--code", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_template_variables() {
        let args = Args::try_parse_from([
            "tikzcell",
            "-",
            "-j",
            "--var",
            "color=blue",
            "--var",
            "expr=a=b",
        ])
        .unwrap();

        assert!(args.renders_template());
        assert_eq!(
            args.vars,
            vec![
                ("color".to_string(), "blue".to_string()),
                ("expr".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_template_variable() {
        assert!(Args::try_parse_from(["tikzcell", "-", "--var", "novalue"]).is_err());
        assert!(Args::try_parse_from(["tikzcell", "-", "--var", "=value"]).is_err());
    }

    #[test]
    fn test_tex_args_accept_leading_hyphen() {
        let args =
            Args::try_parse_from(["tikzcell", "-", "--tex-args", "-shell-escape"]).unwrap();
        assert_eq!(args.tex_args.as_deref(), Some("-shell-escape"));
    }
}
