//! Replacement nodes produced for diagram blocks.
//!
//! A rendered block is replaced by either an [`ImageNode`] pointing at the
//! written file, or a [`LiteralNode`] holding text art. Ownership passes to the
//! host as soon as the node is returned.

use std::path::{Path, PathBuf};

use crate::attributes::{ALT, Attributes, TARGET, TITLE};

/// Accessibility text used when nothing better is available.
pub const DEFAULT_ALT: &str = "Diagram";

/// The node that replaces a diagram block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNode {
    Image(ImageNode),
    Literal(LiteralNode),
}

impl OutputNode {
    /// Returns the node's attributes.
    pub fn attributes(&self) -> &Attributes {
        match self {
            OutputNode::Image(image) => image.attributes(),
            OutputNode::Literal(literal) => literal.attributes(),
        }
    }

    /// Returns the image node, if this is one.
    pub fn as_image(&self) -> Option<&ImageNode> {
        match self {
            OutputNode::Image(image) => Some(image),
            OutputNode::Literal(_) => None,
        }
    }

    /// Returns the literal node, if this is one.
    pub fn as_literal(&self) -> Option<&LiteralNode> {
        match self {
            OutputNode::Literal(literal) => Some(literal),
            OutputNode::Image(_) => None,
        }
    }
}

/// Reference to a rendered image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNode {
    target: String,
    path: PathBuf,
    attributes: Attributes,
}

impl ImageNode {
    /// Creates an image node.
    ///
    /// `target` is recorded in the node's attributes, and `alt` is filled in
    /// from `title`, then `target`, then [`DEFAULT_ALT`] when it is not
    /// already set. Pass `explicit_target` only when the block named its own
    /// file; generated names are never used as accessibility text.
    pub fn new(
        target: impl Into<String>,
        path: impl Into<PathBuf>,
        mut attributes: Attributes,
        explicit_target: Option<&str>,
    ) -> Self {
        let target = target.into();
        let alt = fallback_alt(&attributes, explicit_target);

        attributes.insert(TARGET, target.clone());
        attributes.insert(ALT, alt);

        Self {
            target,
            path: path.into(),
            attributes,
        }
    }

    /// Returns the image file name, as referenced by the document.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the path the image was written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the node's attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the accessibility text.
    pub fn alt(&self) -> &str {
        self.attributes.get(ALT).unwrap_or(DEFAULT_ALT)
    }
}

/// Inline monospace text produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralNode {
    content: String,
    attributes: Attributes,
}

impl LiteralNode {
    pub fn new(content: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            content: content.into(),
            attributes,
        }
    }

    /// Returns the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the node's attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Picks the accessibility text for an image.
///
/// Priority: explicit `alt`, then `title`, then the humanized `target`, then
/// [`DEFAULT_ALT`].
pub fn fallback_alt(attributes: &Attributes, target: Option<&str>) -> String {
    if let Some(alt) = attributes.get(ALT) {
        return alt.to_string();
    }
    if let Some(title) = attributes.get(TITLE) {
        return title.to_string();
    }
    match target {
        Some(target) => humanize_target(target),
        None => DEFAULT_ALT.to_string(),
    }
}

/// Turns a file name into readable text: the extension is dropped and `_` or
/// `-` become spaces.
///
/// # Examples
///
/// ```
/// use umlblock_core::node::humanize_target;
///
/// assert_eq!(humanize_target("images/order_flow-v2.png"), "order flow v2");
/// ```
pub fn humanize_target(target: &str) -> String {
    let path = Path::new(target);
    let stem = path
        .file_stem()
        .or_else(|| path.file_name())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.replace(['_', '-'], " ")
}
