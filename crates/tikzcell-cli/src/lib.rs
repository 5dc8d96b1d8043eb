//! CLI logic for the tikzcell renderer.
//!
//! This module reads a TeX/TikZ fragment, assembles the LaTeX document and
//! compiles it into an image, printing or saving the intermediate results
//! on request.

pub mod config;
pub mod error_adapter;

mod args;

pub use args::Args;

use std::{
    env, fs,
    io::{self, Read},
};

use log::{debug, info};

use tikzcell::{
    DocumentBuilder, ImageFormat, Namespace, OptionsError, TikzcellError, config::AppConfig,
    template,
};

/// Run the tikzcell CLI application
///
/// # Errors
///
/// Returns `TikzcellError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid option combinations
/// - Template errors
/// - Compilation errors
pub fn run(args: &Args) -> Result<(), TikzcellError> {
    info!(
        input:? = args.input,
        output:% = args.output.display();
        "Processing fragment"
    );

    // Load configuration, then layer environment and flags on top
    let mut app_config = config::load_config(args.config.as_ref())?;
    config::apply_env_overrides(&mut app_config, |name| env::var(name).ok());
    apply_arg_overrides(&mut app_config, args);

    // Read the fragment and the template variables
    let source = read_source(args)?;
    let namespace = if args.renders_template() {
        Some(build_namespace(args)?)
    } else {
        None
    };

    // Assemble the document using the DocumentBuilder API
    let builder = DocumentBuilder::new(app_config);
    let document = builder.prepare(&source, &args.option_request(), namespace.as_ref())?;

    if args.print_jinja {
        println!("{document}");
    }
    if args.print_tex {
        println!("{}", document.full_latex());
    }

    // Saving the document does not need a compiled image
    if let Some(dest) = &args.save_tex {
        builder.save_tex(&document, dest)?;
    }
    if let Some(dest) = &args.save_tikz {
        builder.save_tikz(&document, dest)?;
    }

    if args.no_compile {
        info!("Compilation skipped");
        return Ok(());
    }

    // Flags override the configured output format
    let mut options = builder
        .compile_options()
        .with_full_err(args.full_err)
        .with_keep_temp(args.keep_temp);
    if args.rasterize {
        options = options.with_format(ImageFormat::Png);
    }
    if let Some(dpi) = args.dpi {
        options = options.with_dpi(dpi);
    }
    if args.gray {
        options = options.with_grayscale(true);
    }

    // Compile and write the outputs
    let image = builder.compile(&document, &options)?;
    let path = builder.save_image(&image, &args.output)?;
    if let Some(dest) = &args.save_pdf {
        builder.save_pdf(&image, dest)?;
    }

    info!(output_file:% = path.display(); "Image exported successfully");

    Ok(())
}

/// Command-line flags take precedence over the configuration file.
fn apply_arg_overrides(config: &mut AppConfig, args: &Args) {
    let compiler = config.compiler_mut();
    if let Some(tex_program) = &args.tex_program {
        compiler.set_tex_program(tex_program.as_str());
    }
    if let Some(tex_args) = &args.tex_args {
        compiler.set_tex_args(tex_args.as_str());
    }
}

/// Reads the fragment from `--code`, the input file or stdin.
fn read_source(args: &Args) -> Result<String, TikzcellError> {
    if let Some(code) = &args.code {
        return Ok(code.clone());
    }

    match args.input.as_deref() {
        Some("-") => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
        None => Err(OptionsError::MissingFragment.into()),
    }
}

/// Collects template variables: the `--vars` file first, then each `--var`.
fn build_namespace(args: &Args) -> Result<Namespace, TikzcellError> {
    let mut namespace = match &args.vars_file {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            template::parse_namespace(&content)
                .map_err(|err| TikzcellError::new_template_error(err, content))?
        }
        None => Namespace::new(),
    };

    for (key, value) in &args.vars {
        namespace.insert(key.clone(), toml::Value::String(value.clone()));
    }

    debug!(variables = namespace.len(); "Template namespace built");
    Ok(namespace)
}
