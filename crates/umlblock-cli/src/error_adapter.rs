//! Error adapter for converting UmlBlockError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use umlblock::{RenderError, UmlBlockError};

/// Adapter giving a [`UmlBlockError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a UmlBlockError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            UmlBlockError::Config(_) => "umlblock::config",
            UmlBlockError::Render(_) => "umlblock::render",
            UmlBlockError::UnsupportedFormat(_) => "umlblock::format",
            UmlBlockError::Io(_) => "umlblock::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            UmlBlockError::Config(_) => {
                "set `renderer.java_home` in the configuration file or export JAVA_HOME"
            }
            UmlBlockError::Render(RenderError::Exit { .. }) => {
                "check the diagram source for syntax errors"
            }
            UmlBlockError::Render(RenderError::Timeout(_)) => {
                "raise `renderer.timeout_secs` or simplify the diagram"
            }
            UmlBlockError::Render(RenderError::Spawn(_)) => {
                "make sure `bin/java` exists under the configured Java home"
            }
            UmlBlockError::Render(_) => return None,
            UmlBlockError::UnsupportedFormat(_) => "use one of: txt, utxt, svg, png",
            UmlBlockError::Io(_) => "make sure the images directory exists and is writable",
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
