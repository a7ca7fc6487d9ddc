//! Export error types

use std::path::PathBuf;

use crate::scene::{ActionId, ArmatureId, BoneId};

/// Structural failure while reading the scene graph.
///
/// Any of these aborts the whole export; no partial document is produced.
/// Missing animation or non-armature objects are not errors, they are
/// encoded as `null` fields.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Bone '{bone}' has a non-decomposable transform: {reason}")]
    NonDecomposableTransform { bone: String, reason: String },

    #[error("Armature object '{object}' has no armature data")]
    MissingArmatureData { object: String },

    #[error("Object '{object}' references unknown armature {armature}")]
    UnresolvedArmature { object: String, armature: ArmatureId },

    #[error("Object '{object}' references unknown action {action}")]
    UnresolvedAction { object: String, action: ActionId },

    #[error("Object '{object}' is not linked into any scene")]
    NoOwningScene { object: String },

    #[error("Armature '{armature}' contains bone id {bone} more than once")]
    DuplicateBoneId { armature: String, bone: BoneId },

    #[error("Bone '{bone}' in armature '{armature}' is its own parent")]
    SelfParentedBone { armature: String, bone: String },
}

impl ExportError {
    /// Name of the object or bone the error is attached to
    pub fn subject(&self) -> &str {
        match self {
            Self::NonDecomposableTransform { bone, .. } => bone,
            Self::MissingArmatureData { object }
            | Self::UnresolvedArmature { object, .. }
            | Self::UnresolvedAction { object, .. }
            | Self::NoOwningScene { object } => object,
            Self::DuplicateBoneId { armature, .. } => armature,
            Self::SelfParentedBone { bone, .. } => bone,
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Failure persisting a document
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}
