//! umlblock Core Types and Definitions
//!
//! This crate provides the foundational types for turning PlantUML diagram
//! blocks into rendered document nodes. It includes:
//!
//! - **Formats**: The immutable format registry ([`format::FormatRegistry`])
//! - **Sources**: Marker-normalized diagram text ([`source::DiagramSource`])
//! - **Digests**: Content addressing for default file names ([`digest::digest`])
//! - **Attributes**: Typed split of block attributes ([`attributes`] module)
//! - **Nodes**: Replacement nodes handed back to the host ([`node`] module)

pub mod attributes;
pub mod digest;
pub mod format;
pub mod node;
pub mod source;
