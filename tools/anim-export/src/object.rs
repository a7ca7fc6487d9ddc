//! Scene object -> interchange object record

use anim_shared::SceneObject;

use crate::action::export_action;
use crate::error::{ExportError, ExportResult};
use crate::options::ExportOptions;
use crate::scene::{Object, SceneGraph};
use crate::skeleton::export_bones;

/// Frame rate of the first scene (in scene order) linking `object`.
///
/// Later scenes are ignored even if their rate differs.
pub fn object_fps(graph: &SceneGraph, object: &Object, options: &ExportOptions) -> ExportResult<f32> {
    let mut scenes = graph.scenes_with(object.id);

    let Some(first) = scenes.next() else {
        return options
            .fallback_fps
            .ok_or_else(|| ExportError::NoOwningScene {
                object: object.name.clone(),
            });
    };

    for other in scenes.filter(|s| s.fps != first.fps) {
        tracing::warn!(
            "Object '{}' is linked into scene '{}' at {} fps; using {} fps from scene '{}'",
            object.name,
            other.name,
            other.fps,
            first.fps,
            first.name
        );
    }

    Ok(first.fps)
}

/// Convert one object.
///
/// Only an armature with bound animation data carries a bone list; the action
/// is attached when that animation data has an active one. Every other object,
/// including an armature without animation data, gets `null` for both.
pub fn export_object(
    graph: &SceneGraph,
    object: &Object,
    options: &ExportOptions,
) -> ExportResult<SceneObject> {
    let fps = object_fps(graph, object, options)?;

    let animation = match &object.animation {
        Some(animation) if object.kind.is_armature() => animation,
        _ => {
            tracing::debug!("Exported object '{}' ({})", object.name, object.kind);
            return Ok(SceneObject {
                kind: object.kind.clone(),
                name: object.name.clone(),
                fps,
                animation_action: None,
                bones: None,
            });
        }
    };

    let armature_id = object.data.ok_or_else(|| ExportError::MissingArmatureData {
        object: object.name.clone(),
    })?;
    let armature = graph
        .armature(armature_id)
        .ok_or_else(|| ExportError::UnresolvedArmature {
            object: object.name.clone(),
            armature: armature_id,
        })?;

    let action = match animation.action {
        Some(action_id) => {
            let action = graph
                .action(action_id)
                .ok_or_else(|| ExportError::UnresolvedAction {
                    object: object.name.clone(),
                    action: action_id,
                })?;
            Some(export_action(action, options))
        }
        None => None,
    };

    let bones = export_bones(armature)?;

    tracing::debug!(
        "Exported armature '{}': {} bones, action {:?}",
        object.name,
        bones.len(),
        action.as_ref().map(|a| a.name.as_str())
    );

    Ok(SceneObject {
        kind: object.kind.clone(),
        name: object.name.clone(),
        fps,
        animation_action: action,
        bones: Some(bones),
    })
}
