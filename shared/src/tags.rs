//! String tags carried verbatim from the authoring application.
//!
//! All tags serialize to the upper-case identifiers the authoring tool uses
//! (`"ARMATURE"`, `"BEZIER"`, `"AUTO_CLAMPED"`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a top-level scene object.
///
/// Only [`ObjectKind::Armature`] changes export behavior; every other kind is
/// reported as a bare record. Unknown kinds round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    Armature,
    Mesh,
    Camera,
    Light,
    Empty,
    Curve,
    Lattice,
    Other(String),
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Armature => "ARMATURE",
            Self::Mesh => "MESH",
            Self::Camera => "CAMERA",
            Self::Light => "LIGHT",
            Self::Empty => "EMPTY",
            Self::Curve => "CURVE",
            Self::Lattice => "LATTICE",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_armature(&self) -> bool {
        matches!(self, Self::Armature)
    }
}

impl From<String> for ObjectKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "ARMATURE" => Self::Armature,
            "MESH" => Self::Mesh,
            "CAMERA" => Self::Camera,
            "LIGHT" => Self::Light,
            "EMPTY" => Self::Empty,
            "CURVE" => Self::Curve,
            "LATTICE" => Self::Lattice,
            _ => Self::Other(tag),
        }
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpolation mode stored on a keyframe, governing the segment that
/// starts at that keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interpolation {
    Constant,
    Linear,
    #[default]
    Bezier,
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    Expo,
    Circ,
    Back,
    Bounce,
    Elastic,
}

/// Bezier handle kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandleKind {
    Free,
    Aligned,
    Vector,
    Auto,
    #[default]
    AutoClamped,
}

/// Keyframe classification shown in the dope sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyframeType {
    #[default]
    Keyframe,
    Breakdown,
    MovingHold,
    Extreme,
    Jitter,
    Generated,
}

/// Easing applied by the dynamic-effect interpolation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Easing {
    #[default]
    Auto,
    EaseIn,
    EaseOut,
    EaseInOut,
}
