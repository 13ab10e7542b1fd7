//! Renderer invocation.
//!
//! A [`Renderer`] turns normalized diagram source plus an optional format flag
//! into the engine's raw output bytes. Two strategies exist:
//!
//! - [`ProcessRenderer`] spawns the engine through a Java runtime and pipes
//!   the source over stdin.
//! - [`EmbeddedRenderer`] drives an in-process [`Engine`] against an in-memory
//!   sink, avoiding the engine CLI's habit of exiting the hosting process.
//!
//! The strategy is picked once from configuration with [`from_config`].

mod embedded;
#[cfg(feature = "jvm")]
mod jvm;
mod process;

pub use embedded::{
    ERROR_DESCRIPTION, EmbeddedRenderer, Engine, EngineOptions, check_description,
};
#[cfg(feature = "jvm")]
pub use jvm::JvmEngine;
pub use process::ProcessRenderer;

use log::info;

use crate::{
    config::{RenderStrategy, RendererConfig},
    error::UmlBlockError,
};

/// Flags passed to the engine on every run, regardless of strategy.
pub const BASE_FLAGS: [&str; 3] = ["-charset", "UTF-8", "-failonerror"];

/// Flag that makes the engine read source from stdin and write to stdout.
pub const PIPE_FLAG: &str = "-pipe";

/// Renders diagram source with the external engine.
///
/// Implementations are shared between callers; each call performs an
/// independent engine invocation.
pub trait Renderer: Send + Sync {
    /// Renders `source` and returns the engine's raw output.
    ///
    /// # Arguments
    ///
    /// * `source` - Normalized diagram source
    /// * `flag` - Format flag for the engine, or `None` for the engine default
    ///
    /// # Errors
    ///
    /// Returns [`UmlBlockError::Config`] if the renderer is missing a required
    /// setting and [`UmlBlockError::Render`] if the engine fails. No partial
    /// output is returned on failure.
    fn render(&self, source: &str, flag: Option<&str>) -> Result<Vec<u8>, UmlBlockError>;
}

/// Engine arguments: the base flags followed by the format flag, if any.
pub fn engine_args(flag: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = BASE_FLAGS.iter().map(|f| f.to_string()).collect();
    args.extend(flag.map(str::to_string));
    args
}

/// Builds the renderer selected by `config`.
///
/// # Errors
///
/// Returns [`UmlBlockError::Config`] if the embedded strategy is selected but
/// this build has no in-process engine, or if the engine cannot be loaded.
pub fn from_config(config: &RendererConfig) -> Result<Box<dyn Renderer>, UmlBlockError> {
    info!(strategy:? = config.strategy(); "Selecting renderer");

    match config.strategy() {
        RenderStrategy::Process => Ok(Box::new(ProcessRenderer::from_config(config))),
        RenderStrategy::Embedded => embedded_from_config(config),
    }
}

#[cfg(feature = "jvm")]
fn embedded_from_config(config: &RendererConfig) -> Result<Box<dyn Renderer>, UmlBlockError> {
    let engine = JvmEngine::new(config.jar())?;
    Ok(Box::new(EmbeddedRenderer::new(engine)))
}

#[cfg(not(feature = "jvm"))]
fn embedded_from_config(_config: &RendererConfig) -> Result<Box<dyn Renderer>, UmlBlockError> {
    Err(UmlBlockError::config(
        "the embedded renderer requires umlblock to be built with the `jvm` feature",
    ))
}
