//! In-process rendering through the engine's library entry points.
//!
//! The engine's command-line entry point terminates the hosting process when
//! it finishes, so an embedded renderer never goes through it. Instead an
//! [`Engine`] exposes the lower-level generation step, and
//! [`EmbeddedRenderer`] drives it against an in-memory sink.

use std::io::Write;

use log::debug;

use crate::{
    error::{RenderError, UmlBlockError},
    render::{Renderer, engine_args},
};

/// Engine options, equivalent to the command-line arguments of a run.
///
/// Holds the base flags and the format flag. Pipe mode is never requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    args: Vec<String>,
}

impl EngineOptions {
    /// Builds options from the base flags and an optional format flag.
    pub fn new(flag: Option<&str>) -> Self {
        Self {
            args: engine_args(flag),
        }
    }

    /// Returns the options as engine arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Low-level access to a diagram engine running inside this process.
pub trait Engine: Send + Sync {
    /// Generates the first diagram in `source`, writing the result to `sink`.
    ///
    /// Implementations must not terminate the process.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Engine`] if the engine reports a failure.
    fn generate(
        &self,
        source: &str,
        options: &EngineOptions,
        sink: &mut dyn Write,
    ) -> Result<(), RenderError>;
}

/// Description the engine reports for a diagram it could not parse.
pub const ERROR_DESCRIPTION: &str = "(Error)";

/// Interprets the description an engine returns alongside a generated image.
///
/// The engine still produces an image for a broken diagram, so the
/// description is what tells success from failure. A missing description
/// means the source held no diagram at all.
///
/// # Errors
///
/// Returns [`RenderError::Engine`] if the description is missing or marks an error.
pub fn check_description(description: Option<&str>) -> Result<(), RenderError> {
    match description {
        None => Err(RenderError::Engine(
            "no diagram found in the source".to_string(),
        )),
        Some(text) if text.trim_start().starts_with(ERROR_DESCRIPTION) => Err(
            RenderError::Engine("diagram source has a syntax error".to_string()),
        ),
        Some(_) => Ok(()),
    }
}

/// Renders by calling an in-process [`Engine`].
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use umlblock::RenderError;
/// use umlblock::render::{EmbeddedRenderer, Engine, EngineOptions, Renderer};
///
/// struct Echo;
///
/// impl Engine for Echo {
///     fn generate(
///         &self,
///         source: &str,
///         _options: &EngineOptions,
///         sink: &mut dyn Write,
///     ) -> Result<(), RenderError> {
///         sink.write_all(source.as_bytes())
///             .map_err(|err| RenderError::Engine(err.to_string()))
///     }
/// }
///
/// let renderer = EmbeddedRenderer::new(Echo);
/// let bytes = renderer.render("@startuml\nA->B\n@enduml", None).unwrap();
/// assert_eq!(bytes, b"@startuml\nA->B\n@enduml");
/// ```
#[derive(Debug)]
pub struct EmbeddedRenderer<E> {
    engine: E,
}

impl<E: Engine> EmbeddedRenderer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Returns the wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: Engine> Renderer for EmbeddedRenderer<E> {
    fn render(&self, source: &str, flag: Option<&str>) -> Result<Vec<u8>, UmlBlockError> {
        let options = EngineOptions::new(flag);
        debug!(args:? = options.args(); "Generating diagram in process");

        let mut sink = Vec::new();
        self.engine.generate(source, &options, &mut sink)?;

        debug!(bytes = sink.len(); "Engine finished");
        Ok(sink)
    }
}
