//! Document assembly
//!
//! Entry point of the exporter: walks every object of a scene graph in
//! enumeration order and wraps the records with the format version.

use anim_shared::Document;

use crate::error::ExportResult;
use crate::object::export_object;
use crate::options::ExportOptions;
use crate::scene::SceneGraph;

/// Build the interchange document for `graph`.
///
/// The first failing object aborts the export; a document is only returned
/// when every object serialized.
pub fn export_document(graph: &SceneGraph, options: &ExportOptions) -> ExportResult<Document> {
    let objects = graph
        .objects
        .iter()
        .map(|object| export_object(graph, object, options))
        .collect::<ExportResult<Vec<_>>>()?;

    let document = Document::new(objects);
    let summary = ExportSummary::of(&document);
    tracing::info!(
        "Assembled document: {} objects ({} armatures, {} bones), {} actions, {} channels, {} keyframes",
        summary.objects,
        summary.armatures,
        summary.bones,
        summary.actions,
        summary.channels,
        summary.keyframes
    );

    Ok(document)
}

/// Element counts of an exported document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub objects: usize,
    pub armatures: usize,
    pub bones: usize,
    pub actions: usize,
    pub channels: usize,
    pub keyframes: usize,
}

impl ExportSummary {
    pub fn of(document: &Document) -> Self {
        let mut summary = Self {
            objects: document.objects.len(),
            ..Default::default()
        };

        for object in &document.objects {
            if let Some(bones) = &object.bones {
                summary.armatures += 1;
                summary.bones += bones.len();
            }
            if let Some(action) = &object.animation_action {
                summary.actions += 1;
                for group in &action.groups {
                    summary.channels += group.channels.len();
                    summary.keyframes += group
                        .channels
                        .iter()
                        .map(|c| c.key_frames.len())
                        .sum::<usize>();
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::scene::{AnimationData, Object, ObjectId, Scene};
    use anim_shared::{ObjectKind, FORMAT_VERSION};

    fn object(id: u32, name: &str, kind: ObjectKind) -> Object {
        Object {
            id: ObjectId(id),
            name: name.to_string(),
            kind,
            data: None,
            animation: None,
        }
    }

    #[test]
    fn test_preserves_enumeration_order() {
        let graph = SceneGraph {
            scenes: vec![Scene {
                name: "Scene".into(),
                fps: 24.0,
                objects: vec![ObjectId(3), ObjectId(1), ObjectId(2)],
            }],
            objects: vec![
                object(3, "Zeta", ObjectKind::Mesh),
                object(1, "Alpha", ObjectKind::Camera),
                object(2, "Mid", ObjectKind::Empty),
            ],
            ..Default::default()
        };

        let document = export_document(&graph, &ExportOptions::default()).unwrap();
        assert_eq!(document.version, FORMAT_VERSION);
        let names: Vec<_> = document.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_empty_scene_graph() {
        let document = export_document(&SceneGraph::default(), &ExportOptions::default()).unwrap();
        assert!(document.objects.is_empty());
        assert_eq!(ExportSummary::of(&document), ExportSummary::default());
    }

    #[test]
    fn test_one_failing_object_fails_everything() {
        let mut broken = object(2, "BrokenRig", ObjectKind::Armature);
        broken.data = None;
        broken.animation = Some(AnimationData::default());
        let graph = SceneGraph {
            scenes: vec![Scene {
                name: "Scene".into(),
                fps: 24.0,
                objects: vec![ObjectId(1), ObjectId(2)],
            }],
            objects: vec![object(1, "Camera", ObjectKind::Camera), broken],
            ..Default::default()
        };

        let err = export_document(&graph, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::MissingArmatureData { .. }));
        assert_eq!(err.subject(), "BrokenRig");
    }
}
