//! umlblock - Render PlantUML diagram blocks at document-build time.
//!
//! Diagram blocks found in a document are rendered by the PlantUML engine
//! into image files or text art, and replaced with nodes the host can place
//! in its document tree.

pub mod config;
pub mod render;
pub mod transform;

mod error;

pub use umlblock_core::{attributes, digest, format, node, source};

pub use error::{RenderError, UmlBlockError};

use log::{debug, info};

use umlblock_core::{format::FormatRegistry, node::OutputNode};

use config::AppConfig;
use render::Renderer;
use transform::{BlockTransformer, DiagramBlock};

/// Entry point for processing diagram blocks.
///
/// A processor selects its renderer once, from configuration, and reuses it
/// for every block.
///
/// # Examples
///
/// ```rust,no_run
/// use umlblock::{BlockProcessor, config::AppConfig};
/// use umlblock::attributes::Attributes;
/// use umlblock::transform::DiagramBlock;
///
/// let processor = BlockProcessor::new(AppConfig::default())
///     .expect("Failed to set up renderer");
///
/// let attributes = Attributes::new().with_positional(["sequence.svg", "svg"]);
/// let node = processor
///     .process(DiagramBlock::new("Alice -> Bob: hello", attributes))
///     .expect("Failed to render");
///
/// println!("{:?}", node);
/// ```
pub struct BlockProcessor {
    config: AppConfig,
    registry: &'static FormatRegistry,
    renderer: Box<dyn Renderer>,
}

impl BlockProcessor {
    /// Create a new processor with the renderer selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`UmlBlockError::Config`] if the configured strategy cannot be
    /// set up.
    pub fn new(config: AppConfig) -> Result<Self, UmlBlockError> {
        let renderer = render::from_config(config.renderer())?;
        Ok(Self::with_renderer(config, renderer))
    }

    /// Create a new processor with an explicit renderer.
    ///
    /// The renderer settings in `config` are ignored; the document settings
    /// still apply.
    pub fn with_renderer(config: AppConfig, renderer: Box<dyn Renderer>) -> Self {
        Self {
            config,
            registry: FormatRegistry::standard(),
            renderer,
        }
    }

    /// Returns the processor's configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render a diagram block and build its replacement node.
    ///
    /// # Errors
    ///
    /// Returns `UmlBlockError` for unsupported formats, renderer
    /// configuration problems, renderer failures, or image write failures.
    pub fn process(&self, block: DiagramBlock) -> Result<OutputNode, UmlBlockError> {
        info!("Processing diagram block");

        let transformer = BlockTransformer::new(
            self.registry,
            self.renderer.as_ref(),
            self.config.document().images_dir(),
        );
        let node = transformer.transform(block)?;

        debug!(node:?; "Diagram block processed");
        Ok(node)
    }
}
