//! Example: Rendering a diagram block with a custom in-process engine.
//!
//! Any type implementing [`Engine`] can stand in for the embedded JVM. This
//! one draws a box around the diagram source as "text art".
//!
//! Run with: `cargo run --example custom_engine -p umlblock`

use std::io::Write;

use umlblock::{
    BlockProcessor, RenderError,
    attributes::Attributes,
    config::AppConfig,
    node::OutputNode,
    render::{EmbeddedRenderer, Engine, EngineOptions},
    transform::DiagramBlock,
};

struct BoxEngine;

impl Engine for BoxEngine {
    fn generate(
        &self,
        source: &str,
        _options: &EngineOptions,
        sink: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let width = source.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        let border = format!("+{}+", "-".repeat(width + 2));

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        for line in source.lines() {
            out.push_str(&format!("| {line:<width$} |\n"));
        }
        out.push_str(&border);

        sink.write_all(out.as_bytes())
            .map_err(|err| RenderError::Engine(err.to_string()))
    }
}

fn main() {
    let processor = BlockProcessor::with_renderer(
        AppConfig::default(),
        Box::new(EmbeddedRenderer::new(BoxEngine)),
    );

    let attributes: Attributes = [("format", "txt")].into_iter().collect();
    let block = DiagramBlock::new("Alice -> Bob: hello\nBob --> Alice: hi", attributes);

    match processor.process(block) {
        Ok(OutputNode::Literal(literal)) => println!("{}", literal.content()),
        Ok(OutputNode::Image(image)) => println!("Image written to {}", image.path().display()),
        Err(err) => eprintln!("Failed to render: {err}"),
    }
}
