//! CLI logic for the umlblock diagram tool.
//!
//! Reads one diagram source, treats it as a single diagram block, and renders
//! it through the umlblock library.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Read},
};

use log::info;

use umlblock::{
    BlockProcessor, UmlBlockError,
    attributes::{Attributes, FORMAT, TARGET},
    node::OutputNode,
    transform::DiagramBlock,
};

/// Run the umlblock CLI application
///
/// Renders the input and prints the image path, or the text art itself for
/// literal formats.
///
/// # Errors
///
/// Returns `UmlBlockError` for:
/// - Configuration loading errors and malformed `--attr` values
/// - Input read errors
/// - Unsupported formats
/// - Rendering errors
/// - Image write errors
pub fn run(args: &Args) -> Result<(), UmlBlockError> {
    match render(args)? {
        OutputNode::Image(image) => println!("{}", image.path().display()),
        OutputNode::Literal(literal) => println!("{}", literal.content()),
    }
    Ok(())
}

/// Render the input described by `args` and return the produced node.
///
/// # Errors
///
/// See [`run`].
pub fn render(args: &Args) -> Result<OutputNode, UmlBlockError> {
    info!(input_path = args.input; "Processing diagram");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(images_dir) = &args.images_dir {
        app_config.document_mut().set_images_dir(images_dir);
    }

    let attributes = block_attributes(args)?;
    let text = read_input(&args.input)?;

    let processor = BlockProcessor::new(app_config)?;
    processor.process(DiagramBlock::new(text, attributes))
}

fn read_input(input: &str) -> Result<String, UmlBlockError> {
    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(fs::read_to_string(input)?)
}

/// Builds block attributes from `--attr` pairs, then `--target` and `--format`.
fn block_attributes(args: &Args) -> Result<Attributes, UmlBlockError> {
    let mut attributes = Attributes::new();
    for pair in &args.attr {
        let (key, value) = parse_attr(pair)?;
        attributes.insert(key, value);
    }
    if let Some(target) = &args.target {
        attributes.insert(TARGET, target.as_str());
    }
    if let Some(format) = &args.format {
        attributes.insert(FORMAT, format.as_str());
    }
    Ok(attributes)
}

fn parse_attr(pair: &str) -> Result<(&str, &str), UmlBlockError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(UmlBlockError::config(format!(
            "invalid attribute `{pair}`, expected KEY=VALUE"
        ))),
    }
}
