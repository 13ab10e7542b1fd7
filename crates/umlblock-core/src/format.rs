//! Output formats and the immutable format registry.
//!
//! Every format identifier a diagram block may carry maps to exactly one
//! [`FormatSpec`]: what kind of node it produces, which flag the engine needs,
//! and how the engine's raw bytes are to be read back.
//!
//! # Overview
//!
//! - [`Format`] - The closed set of supported identifiers.
//! - [`FormatSpec`] - Output kind, engine flag and result encoding for a format.
//! - [`FormatRegistry`] - Table from [`Format`] to [`FormatSpec`], built once.
//! - [`RenderOutput`] - Engine bytes decoded under a [`ResultEncoding`].
//!
//! # Example
//!
//! ```
//! use umlblock_core::format::{Format, FormatRegistry, OutputKind};
//!
//! let registry = FormatRegistry::standard();
//! let (format, spec) = registry.lookup("svg").unwrap();
//! assert_eq!(format, Format::Svg);
//! assert_eq!(spec.output_kind(), OutputKind::Image);
//! assert_eq!(spec.flag(), Some("-tsvg"));
//!
//! assert!(registry.lookup("xyz").is_err());
//! ```

use std::{fmt, str::FromStr, sync::OnceLock};

use indexmap::IndexMap;
use log::warn;
use thiserror::Error;

/// Process-wide registry returned by [`FormatRegistry::standard`].
static STANDARD: OnceLock<FormatRegistry> = OnceLock::new();

/// Error returned when a block names a format outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported diagram format `{0}` (expected one of: txt, utxt, svg, png)")]
pub struct UnsupportedFormatError(String);

impl UnsupportedFormatError {
    /// Returns the identifier that was rejected.
    pub fn identifier(&self) -> &str {
        &self.0
    }
}

/// A supported diagram output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// ASCII text art.
    Txt,
    /// Unicode text art.
    Utxt,
    /// Scalable vector image.
    Svg,
    /// Raster image, the engine's default output.
    #[default]
    Png,
}

impl Format {
    /// All supported formats, in registry order.
    pub const ALL: [Format; 4] = [Format::Txt, Format::Utxt, Format::Svg, Format::Png];

    /// Returns the identifier used in block attributes and file extensions.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Utxt => "utxt",
            Format::Svg => "svg",
            Format::Png => "png",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = UnsupportedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" => Ok(Format::Txt),
            "utxt" => Ok(Format::Utxt),
            "svg" => Ok(Format::Svg),
            "png" => Ok(Format::Png),
            other => Err(UnsupportedFormatError(other.to_string())),
        }
    }
}

/// The kind of node a format produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// An image file written to disk and referenced by path.
    Image,
    /// Inline monospace text.
    Literal,
}

/// How the engine's raw output bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultEncoding {
    Utf8,
    Binary,
}

/// Engine output decoded under a [`ResultEncoding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    Text(String),
    Binary(Vec<u8>),
}

impl RenderOutput {
    /// Returns the output as raw bytes, whatever its encoding.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RenderOutput::Text(text) => text.into_bytes(),
            RenderOutput::Binary(bytes) => bytes,
        }
    }
}

/// Rendering behaviour attached to a single [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    output_kind: OutputKind,
    flag: Option<&'static str>,
    encoding: ResultEncoding,
}

impl FormatSpec {
    /// Creates a new format spec.
    pub const fn new(
        output_kind: OutputKind,
        flag: Option<&'static str>,
        encoding: ResultEncoding,
    ) -> Self {
        Self {
            output_kind,
            flag,
            encoding,
        }
    }

    /// Returns the kind of node this format produces.
    pub fn output_kind(&self) -> OutputKind {
        self.output_kind
    }

    /// Returns the engine flag selecting this format, if the engine default is not used.
    pub fn flag(&self) -> Option<&'static str> {
        self.flag
    }

    /// Returns the encoding of the engine's output.
    pub fn encoding(&self) -> ResultEncoding {
        self.encoding
    }

    /// Reinterprets raw engine bytes under this format's encoding.
    ///
    /// Text output that is not valid UTF-8 is decoded lossily.
    pub fn decode(&self, bytes: Vec<u8>) -> RenderOutput {
        match self.encoding {
            ResultEncoding::Binary => RenderOutput::Binary(bytes),
            ResultEncoding::Utf8 => match String::from_utf8(bytes) {
                Ok(text) => RenderOutput::Text(text),
                Err(err) => {
                    warn!(
                        valid_up_to = err.utf8_error().valid_up_to();
                        "Renderer output is not valid UTF-8, decoding lossily"
                    );
                    RenderOutput::Text(String::from_utf8_lossy(err.as_bytes()).into_owned())
                }
            },
        }
    }
}

/// Immutable table from [`Format`] to [`FormatSpec`].
///
/// The table is total over [`Format::ALL`]. It is constructed once and shared
/// by reference; there is no way to mutate it after construction.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    specs: IndexMap<Format, FormatSpec>,
}

impl FormatRegistry {
    /// Builds the registry of supported formats.
    pub fn new() -> Self {
        let specs = Format::ALL
            .into_iter()
            .map(|format| (format, Self::builtin_spec(format)))
            .collect();
        Self { specs }
    }

    /// Returns the process-wide registry.
    pub fn standard() -> &'static FormatRegistry {
        STANDARD.get_or_init(FormatRegistry::new)
    }

    /// Resolves a format identifier to its [`Format`] and [`FormatSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormatError`] if `id` is not one of the supported
    /// identifiers.
    pub fn lookup(&self, id: &str) -> Result<(Format, &FormatSpec), UnsupportedFormatError> {
        let format = id.parse::<Format>()?;
        Ok((format, self.spec(format)))
    }

    /// Returns the spec for a known format.
    ///
    /// # Panics
    ///
    /// Panics if the registry has no entry for `format`. The registry is built
    /// from [`Format::ALL`], so this indicates a programming error.
    pub fn spec(&self, format: Format) -> &FormatSpec {
        self.specs
            .get(&format)
            .unwrap_or_else(|| panic!("format registry has no entry for `{format}`"))
    }

    /// Iterates over all registered formats and their specs.
    pub fn iter(&self) -> impl Iterator<Item = (Format, &FormatSpec)> {
        self.specs.iter().map(|(format, spec)| (*format, spec))
    }

    fn builtin_spec(format: Format) -> FormatSpec {
        match format {
            Format::Txt | Format::Utxt => {
                FormatSpec::new(OutputKind::Literal, Some("-tutxt"), ResultEncoding::Utf8)
            }
            Format::Svg => FormatSpec::new(OutputKind::Image, Some("-tsvg"), ResultEncoding::Binary),
            Format::Png => FormatSpec::new(OutputKind::Image, None, ResultEncoding::Binary),
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_total_over_supported_formats() {
        let registry = FormatRegistry::new();

        for id in ["txt", "utxt", "svg", "png"] {
            let (format, _) = registry.lookup(id).expect("supported format");
            assert_eq!(format.as_str(), id);
        }
    }

    #[test]
    fn test_lookup_unknown_format() {
        let registry = FormatRegistry::new();

        let err = registry.lookup("xyz").unwrap_err();
        assert_eq!(err.identifier(), "xyz");
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = FormatRegistry::new();
        assert!(registry.lookup("PNG").is_err());
        assert!(registry.lookup("").is_err());
    }

    #[test]
    fn test_builtin_specs() {
        let registry = FormatRegistry::new();

        let txt = registry.spec(Format::Txt);
        assert_eq!(txt.output_kind(), OutputKind::Literal);
        assert_eq!(txt.flag(), Some("-tutxt"));
        assert_eq!(txt.encoding(), ResultEncoding::Utf8);

        assert_eq!(registry.spec(Format::Utxt), txt);

        let svg = registry.spec(Format::Svg);
        assert_eq!(svg.output_kind(), OutputKind::Image);
        assert_eq!(svg.flag(), Some("-tsvg"));
        assert_eq!(svg.encoding(), ResultEncoding::Binary);

        let png = registry.spec(Format::Png);
        assert_eq!(png.output_kind(), OutputKind::Image);
        assert_eq!(png.flag(), None);
        assert_eq!(png.encoding(), ResultEncoding::Binary);
    }

    #[test]
    fn test_registry_iterates_in_declared_order() {
        let formats: Vec<_> = FormatRegistry::standard().iter().map(|(f, _)| f).collect();
        assert_eq!(formats, Format::ALL);
    }

    #[test]
    fn test_default_format_is_png() {
        assert_eq!(Format::default(), Format::Png);
    }

    #[test]
    fn test_decode_text() {
        let spec = FormatRegistry::standard().spec(Format::Txt);
        assert_eq!(
            spec.decode(b"A -> B".to_vec()),
            RenderOutput::Text("A -> B".to_string())
        );
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let spec = FormatRegistry::standard().spec(Format::Utxt);
        match spec.decode(vec![b'a', 0xFF, b'b']) {
            RenderOutput::Text(text) => assert_eq!(text, "a\u{FFFD}b"),
            RenderOutput::Binary(_) => panic!("Expected text output"),
        }
    }

    #[test]
    fn test_decode_binary_keeps_bytes() {
        let spec = FormatRegistry::standard().spec(Format::Png);
        let bytes = vec![0x89, b'P', b'N', b'G', 0xFF];
        assert_eq!(spec.decode(bytes.clone()), RenderOutput::Binary(bytes));
    }
}
