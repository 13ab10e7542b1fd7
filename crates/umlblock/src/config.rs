//! Configuration types for diagram block rendering.
//!
//! This module provides configuration structures that control how the engine
//! is invoked and where rendered images land. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining renderer and document settings.
//! - [`RendererConfig`] - Selects the [`RenderStrategy`] and locates the engine.
//! - [`DocumentConfig`] - Document-level settings such as the images directory.
//!
//! # Example
//!
//! ```
//! # use umlblock::config::{AppConfig, RenderStrategy};
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.renderer().strategy(), RenderStrategy::Process);
//! assert!(config.document().images_dir().is_none());
//! ```

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Deserializer};

/// Environment variable consulted when no Java installation is configured.
pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

/// Top-level configuration combining renderer and document settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Renderer configuration section.
    #[serde(default)]
    renderer: RendererConfig,

    /// Document configuration section.
    #[serde(default)]
    document: DocumentConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified renderer and document configurations.
    ///
    /// # Arguments
    ///
    /// * `renderer` - Engine location and invocation strategy.
    /// * `document` - Document-level settings.
    pub fn new(renderer: RendererConfig, document: DocumentConfig) -> Self {
        Self { renderer, document }
    }

    /// Returns the renderer configuration.
    pub fn renderer(&self) -> &RendererConfig {
        &self.renderer
    }

    /// Returns the document configuration.
    pub fn document(&self) -> &DocumentConfig {
        &self.document
    }

    /// Returns the document configuration for modification.
    pub fn document_mut(&mut self) -> &mut DocumentConfig {
        &mut self.document
    }
}

/// How the rendering engine is invoked.
///
/// Chosen once at deployment time; nothing probes the platform per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    /// Spawn the engine executable and talk to it over stdin/stdout.
    #[default]
    Process,
    /// Call the engine's library entry points inside this process.
    Embedded,
}

/// Engine location and invocation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Invocation strategy.
    #[serde(default)]
    strategy: RenderStrategy,

    /// Java installation used by the process strategy. Falls back to `$JAVA_HOME`.
    #[serde(default)]
    java_home: Option<PathBuf>,

    /// Path to the engine jar.
    #[serde(default = "default_jar")]
    jar: PathBuf,

    /// Upper bound on a single engine run, read as whole seconds. Unbounded when unset.
    #[serde(default, rename = "timeout_secs", deserialize_with = "deserialize_secs")]
    timeout: Option<Duration>,
}

fn default_jar() -> PathBuf {
    PathBuf::from("plantuml.jar")
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            strategy: RenderStrategy::default(),
            java_home: None,
            jar: default_jar(),
            timeout: None,
        }
    }
}

impl RendererConfig {
    /// Creates a renderer configuration with the given strategy and jar path.
    pub fn new(strategy: RenderStrategy, jar: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            jar: jar.into(),
            ..Self::default()
        }
    }

    /// Sets the Java installation path.
    pub fn with_java_home(mut self, java_home: impl Into<PathBuf>) -> Self {
        self.java_home = Some(java_home.into());
        self
    }

    /// Sets the per-run timeout. Sub-second precision is kept.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the configured invocation strategy.
    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    /// Returns the configured Java installation, without consulting the environment.
    pub fn java_home(&self) -> Option<&Path> {
        self.java_home.as_deref()
    }

    /// Returns the configured Java installation, or `$JAVA_HOME` if unset.
    ///
    /// An empty environment value counts as unset.
    pub fn resolve_java_home(&self) -> Option<PathBuf> {
        self.java_home.clone().or_else(|| {
            env::var_os(JAVA_HOME_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
    }

    /// Returns the engine jar path.
    pub fn jar(&self) -> &Path {
        &self.jar
    }

    /// Returns the per-run timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Document-level settings supplied by the host.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DocumentConfig {
    /// Base directory that image file names are resolved against.
    #[serde(default)]
    images_dir: Option<PathBuf>,
}

impl DocumentConfig {
    /// Creates a document configuration with the given images directory.
    pub fn new(images_dir: Option<PathBuf>) -> Self {
        Self { images_dir }
    }

    /// Returns the images directory, or `None` if the current base is used.
    pub fn images_dir(&self) -> Option<&Path> {
        self.images_dir.as_deref()
    }

    /// Sets the images directory.
    pub fn set_images_dir(&mut self, images_dir: impl Into<PathBuf>) {
        self.images_dir = Some(images_dir.into());
    }
}
