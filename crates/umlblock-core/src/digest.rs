//! Content addressing for default image file names.
//!
//! The digest is only used to name output files deterministically. It is not
//! an integrity check.

use sha2::{Digest, Sha256};

/// Returns the lowercase SHA-256 hex digest of `source`.
///
/// # Examples
///
/// ```
/// use umlblock_core::digest::digest;
///
/// let hex = digest("@startuml\nA->B\n@enduml");
/// assert_eq!(hex.len(), 64);
/// assert_eq!(hex, digest("@startuml\nA->B\n@enduml"));
/// ```
pub fn digest(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}
