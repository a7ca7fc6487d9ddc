//! Read-only scene graph snapshot
//!
//! The exporter never talks to a live authoring application. A host hands it
//! a `SceneGraph` (built in-process, deserialized from JSON, or converted from
//! glTF by [`crate::gltf_scene`]) and the exporter only ever borrows it.

use anim_shared::{Easing, HandleKind, Interpolation, KeyframeType, ObjectKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

typed_id!(
    /// Identity of a scene object
    ObjectId
);
typed_id!(
    /// Identity of an armature datablock
    ArmatureId
);
typed_id!(
    /// Identity of an action datablock
    ActionId
);
typed_id!(
    /// Identity of a bone, unique within its armature.
    ///
    /// Parent lookup goes through this id, so two bones may share a name.
    BoneId
);

/// Whole-file snapshot of the authoring application's data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub armatures: Vec<Armature>,
    #[serde(default)]
    pub actions: Vec<ActionData>,
}

impl SceneGraph {
    /// Load a snapshot previously written as JSON
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene snapshot: {}", path.display()))?;
        Self::parse_json(&content)
    }

    /// Parse a snapshot from a JSON string
    pub fn parse_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse scene snapshot")
    }

    pub fn armature(&self, id: ArmatureId) -> Option<&Armature> {
        self.armatures.iter().find(|a| a.id == id)
    }

    pub fn action(&self, id: ActionId) -> Option<&ActionData> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Scenes referencing `object`, in scene enumeration order
    pub fn scenes_with(&self, object: ObjectId) -> impl Iterator<Item = &Scene> + '_ {
        self.scenes
            .iter()
            .filter(move |scene| scene.objects.contains(&object))
    }
}

/// A scene: a playback rate plus the objects linked into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    /// Effective frames per second (rate divided by base)
    pub fps: f32,
    #[serde(default)]
    pub objects: Vec<ObjectId>,
}

/// A top-level scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    /// Armature datablock, for `ARMATURE` objects
    #[serde(default)]
    pub data: Option<ArmatureId>,
    #[serde(default)]
    pub animation: Option<AnimationData>,
}

/// Animation slot of an object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    /// Active action, if one is assigned
    #[serde(default)]
    pub action: Option<ActionId>,
}

/// Skeletal definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armature {
    pub id: ArmatureId,
    pub name: String,
    #[serde(default)]
    pub bones: Vec<BoneNode>,
}

/// One bone of an armature in bind pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneNode {
    pub id: BoneId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<BoneId>,
    /// Local transform relative to the parent bone, column-major
    #[serde(default = "identity_matrix")]
    pub matrix: [[f32; 4]; 4],
}

fn identity_matrix() -> [[f32; 4]; 4] {
    glam::Mat4::IDENTITY.to_cols_array_2d()
}

/// Action datablock: named groups of curves plus a stored frame range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionData {
    pub id: ActionId,
    pub name: String,
    /// Inclusive [start, end]
    pub frame_range: [f32; 2],
    #[serde(default)]
    pub groups: Vec<GroupData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    pub name: String,
    #[serde(default)]
    pub channels: Vec<FCurve>,
}

/// Animation curve over one scalar component of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FCurve {
    /// RNA path of the animated property, e.g. `pose.bones["Hand"].location`
    pub data_path: String,
    pub array_index: u32,
    #[serde(default)]
    pub keyframe_points: Vec<KeyframePoint>,
}

/// Stored keyframe control point. `co`, `handle_left` and `handle_right` are
/// (frame, value) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframePoint {
    pub co: [f32; 2],
    #[serde(default)]
    pub interpolation: Interpolation,
    pub handle_left: [f32; 2],
    #[serde(default)]
    pub handle_left_type: HandleKind,
    pub handle_right: [f32; 2],
    #[serde(default)]
    pub handle_right_type: HandleKind,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub amplitude: f32,
    #[serde(default, rename = "type")]
    pub keyframe_type: KeyframeType,
}

impl KeyframePoint {
    /// Control point with both handles collapsed onto the key
    pub fn new(frame: f32, value: f32, interpolation: Interpolation) -> Self {
        Self {
            co: [frame, value],
            interpolation,
            handle_left: [frame, value],
            handle_left_type: HandleKind::default(),
            handle_right: [frame, value],
            handle_right_type: HandleKind::default(),
            easing: Easing::default(),
            amplitude: 0.0,
            keyframe_type: KeyframeType::default(),
        }
    }
}
