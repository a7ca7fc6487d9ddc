//! anim-export library
//!
//! Converts an authoring-application scene graph (objects, armatures, actions)
//! into the versioned animation/bind-pose JSON document consumed by AnbMaker.

pub mod action;
pub mod curve;
pub mod document;
pub mod error;
pub mod gltf_scene;
pub mod object;
pub mod options;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod writer;

// Re-export the document schema from shared
pub use anim_shared::{Document, FORMAT_VERSION};

pub use document::{export_document, ExportSummary};
pub use error::{ExportError, ExportResult, WriteError};
pub use gltf_scene::load_gltf_scene;
pub use options::{ExportConfig, ExportOptions};
pub use scene::SceneGraph;
pub use writer::{to_json_string, write_document, write_json};
