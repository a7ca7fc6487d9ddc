//! Shared types for the animation interchange format.
//!
//! The document schema lives here so that exporters and readers agree on a
//! single definition of the wire format.

pub mod document;
pub mod tags;

pub use document::*;
pub use tags::*;

/// File extension for exported animation documents
pub const ANIM_JSON_EXT: &str = "anim.json";

/// File name of the optional exporter configuration
pub const CONFIG_FILE_NAME: &str = "anim-export.toml";
