//! Animation interchange document (format version 1)
//!
//! The JSON layout consumed by the animation authoring tool. Field names are
//! camelCase on the wire; optional sections serialize as `null`, never as
//! empty containers.
//!
//! # Layout
//! ```text
//! Document
//! └── objects[]: SceneObject
//!     ├── animationAction: null | Action
//!     │   └── groups[]: ActionGroup
//!     │       └── channels[]: Channel
//!     │           └── keyFrames[]: KeyFrame (handleLeft / handleRight)
//!     └── bones: null | Bone[]
//! ```

use serde::{Deserialize, Serialize};

use crate::tags::{Easing, HandleKind, Interpolation, KeyframeType, ObjectKind};

/// Current interchange format version
pub const FORMAT_VERSION: &str = "1";

/// Root of an exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub objects: Vec<SceneObject>,
}

impl Document {
    /// Wrap object records with the current format version.
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            objects,
        }
    }

    /// Find an object record by name (first match in export order)
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// One top-level scene object.
///
/// `bones` is `Some` exactly for armatures; `animation_action` is `Some` only
/// for armatures with an assigned active action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub name: String,
    pub fps: f32,
    pub animation_action: Option<Action>,
    pub bones: Option<Vec<Bone>>,
}

/// Animation action bounded by its stored playback range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub name: String,
    pub frame_start: f32,
    pub frame_end: f32,
    pub groups: Vec<ActionGroup>,
}

/// Named bundle of channels (usually all curves of one bone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionGroup {
    pub name: String,
    pub channels: Vec<Channel>,
}

/// One animation curve driving a single scalar component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// `"<property>.<component>"`, e.g. `location.1`
    pub channel_ref: String,
    pub key_frames: Vec<KeyFrame>,
}

/// A single keyframe control point.
///
/// The trailing detail fields are only written when the exporter runs with
/// keyframe details enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFrame {
    pub time: f32,
    pub value: f32,
    pub interpolation: Interpolation,
    pub handle_left: Handle,
    pub handle_right: Handle,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub keyframe_type: Option<KeyframeType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub easing: Option<Easing>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub amplitude: Option<f32>,
}

/// Bezier tangent handle; `frame` is the x (time) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    #[serde(rename = "type")]
    pub kind: HandleKind,
    pub frame: f32,
    pub value: f32,
}

/// Bind-pose bone record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Index into the enclosing bone list; `None` is written as `-1`
    #[serde(with = "parent_index")]
    pub parent: Option<usize>,
    pub translation: [f32; 3],
    /// Quaternion [w, x, y, z]
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

/// `Option<usize>` <-> integer with `-1` for roots.
mod parent_index {
    use serde::{Deserialize, Deserializer, Serializer};

    pub const ROOT: i64 = -1;

    pub fn serialize<S: Serializer>(parent: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match parent {
            Some(index) => s.serialize_u64(*index as u64),
            None => s.serialize_i64(ROOT),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(d)?;
        match raw {
            ROOT => Ok(None),
            index if index >= 0 => Ok(Some(index as usize)),
            other => Err(serde::de::Error::custom(format!(
                "invalid parent index {other}"
            ))),
        }
    }
}
