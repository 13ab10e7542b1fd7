//! Block transformation: diagram block in, replacement node out.
//!
//! Each block goes through the same steps, with no state carried between
//! blocks:
//!
//! 1. Normalize the source so it carries the diagram markers.
//! 2. Split off `target` and `format` and resolve the format.
//! 3. Render and decode the engine output.
//! 4. Write the image, or wrap the text, and build the [`OutputNode`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, trace};

use umlblock_core::{
    attributes::{Attributes, BlockAttributes},
    digest::digest,
    format::{Format, FormatRegistry, OutputKind, RenderOutput},
    node::{ImageNode, LiteralNode, OutputNode},
    source::DiagramSource,
};

use crate::{error::UmlBlockError, render::Renderer};

/// A diagram block as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    text: String,
    attributes: Attributes,
}

impl DiagramBlock {
    /// Creates a block from its raw text and attributes.
    pub fn new(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// Creates a block from its content lines and attributes.
    pub fn from_lines<I, S>(lines: I, attributes: Attributes) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|line| line.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(text, attributes)
    }

    /// Returns the raw block text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the block attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Turns diagram blocks into output nodes.
///
/// Holds only shared, read-only collaborators, so one transformer can serve
/// any number of blocks, from any number of threads.
pub struct BlockTransformer<'a> {
    registry: &'a FormatRegistry,
    renderer: &'a dyn Renderer,
    images_dir: PathBuf,
}

impl<'a> BlockTransformer<'a> {
    /// Creates a transformer.
    ///
    /// # Arguments
    ///
    /// * `registry` - Format table used to resolve `format` attributes
    /// * `renderer` - Engine invocation strategy
    /// * `images_dir` - Base directory for image files; `None` resolves
    ///   against the current directory
    pub fn new(
        registry: &'a FormatRegistry,
        renderer: &'a dyn Renderer,
        images_dir: Option<&Path>,
    ) -> Self {
        Self {
            registry,
            renderer,
            images_dir: images_dir.map(Path::to_path_buf).unwrap_or_default(),
        }
    }

    /// Renders a block and builds its replacement node.
    ///
    /// # Errors
    ///
    /// - [`UmlBlockError::UnsupportedFormat`] if the `format` attribute is not
    ///   supported; nothing is rendered.
    /// - [`UmlBlockError::Config`] or [`UmlBlockError::Render`] from the renderer;
    ///   nothing is written.
    /// - [`UmlBlockError::Io`] if the image file cannot be written.
    pub fn transform(&self, block: DiagramBlock) -> Result<OutputNode, UmlBlockError> {
        let DiagramBlock { text, attributes } = block;

        let source = DiagramSource::new(text);
        trace!(source = source.as_str(); "Normalized diagram source");

        let attributes = BlockAttributes::split(attributes);
        let format_id = attributes.format().unwrap_or(Format::default().as_str());
        let (format, spec) = self.registry.lookup(format_id)?;

        info!(
            format = format.as_str(),
            target:? = attributes.target();
            "Rendering diagram block"
        );

        let bytes = self.renderer.render(source.as_str(), spec.flag())?;
        let output = spec.decode(bytes);

        match spec.output_kind() {
            OutputKind::Image => self.write_image(&source, format, attributes, output.into_bytes()),
            OutputKind::Literal => match output {
                RenderOutput::Text(content) => Ok(OutputNode::Literal(LiteralNode::new(
                    content,
                    attributes.into_rest(),
                ))),
                RenderOutput::Binary(_) => {
                    unreachable!("literal format `{format}` must decode to text")
                }
            },
        }
    }

    /// Returns the file name used for an image when the block names none.
    pub fn default_file_name(source: &DiagramSource, format: Format) -> String {
        format!("{}.{format}", digest(source.as_str()))
    }

    fn write_image(
        &self,
        source: &DiagramSource,
        format: Format,
        attributes: BlockAttributes,
        bytes: Vec<u8>,
    ) -> Result<OutputNode, UmlBlockError> {
        let target = attributes.target().map(str::to_owned);
        let file_name = target
            .clone()
            .unwrap_or_else(|| Self::default_file_name(source, format));
        let path = self.images_dir.join(&file_name);

        fs::write(&path, &bytes)?;
        info!(
            path = path.display().to_string(),
            bytes = bytes.len();
            "Diagram image written"
        );

        Ok(OutputNode::Image(ImageNode::new(
            file_name,
            path,
            attributes.into_rest(),
            target.as_deref(),
        )))
    }
}
