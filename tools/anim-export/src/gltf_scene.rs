//! glTF scene provider (glTF/GLB -> SceneGraph)
//!
//! Maps glTF concepts onto the authoring-application model the exporter reads:
//! - every skin becomes an `ARMATURE` object whose bones are the skin joints
//! - every node that is not a joint becomes a `MESH`, `CAMERA` or `EMPTY` object
//! - the first animation targeting a skin's joints becomes that armature's
//!   active action, one group per joint, with `pose.bones["..."]` channel paths
//!
//! glTF timelines are in seconds; keys are converted to frames at a fixed rate.

use anim_shared::{HandleKind, Interpolation, ObjectKind};
use anyhow::{Context, Result};
use glam::Mat4;
use gltf::animation::util::ReadOutputs;
use gltf::animation::Interpolation as GltfInterpolation;
use hashbrown::{HashMap, HashSet};
use std::path::Path;

use crate::scene::{
    ActionData, ActionId, AnimationData, Armature, ArmatureId, BoneId, BoneNode, FCurve,
    GroupData, KeyframePoint, Object, ObjectId, Scene, SceneGraph,
};

/// Load a glTF/GLB file as a scene graph, converting seconds to frames at `fps`
pub fn load_gltf_scene(path: &Path, fps: f32) -> Result<SceneGraph> {
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF: {:?}", path))?;

    let graph = convert_gltf(&document, &buffers, fps)?;

    tracing::info!(
        "Loaded {:?}: {} objects, {} armatures, {} actions, {} scenes",
        path,
        graph.objects.len(),
        graph.armatures.len(),
        graph.actions.len(),
        graph.scenes.len()
    );

    Ok(graph)
}

/// Convert an imported glTF document
pub fn convert_gltf(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    fps: f32,
) -> Result<SceneGraph> {
    let hierarchy = Hierarchy::new(document);
    let node_count = hierarchy.locals.len();

    let skins: Vec<(gltf::Skin, HashSet<usize>)> = document
        .skins()
        .map(|skin| {
            let joints = skin.joints().map(|j| j.index()).collect();
            (skin, joints)
        })
        .collect();
    let all_joints: HashSet<usize> = skins.iter().flat_map(|(_, j)| j.iter().copied()).collect();

    let mut graph = SceneGraph::default();
    // object id -> nodes whose presence in a scene links the object
    let mut membership: Vec<(ObjectId, Vec<usize>)> = Vec::new();

    for node in document.nodes().filter(|n| !all_joints.contains(&n.index())) {
        let kind = if node.mesh().is_some() {
            ObjectKind::Mesh
        } else if node.camera().is_some() {
            ObjectKind::Camera
        } else {
            ObjectKind::Empty
        };
        let id = ObjectId(node.index() as u32);
        graph.objects.push(Object {
            id,
            name: node_name(&node),
            kind,
            data: None,
            animation: None,
        });
        membership.push((id, vec![node.index()]));
    }

    for (skin, joints) in &skins {
        let armature_id = ArmatureId(skin.index() as u32);
        let name = skin
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Armature_{}", skin.index()));

        let bones = skin
            .joints()
            .map(|joint| {
                let (parent, matrix) = hierarchy.joint_local(joint.index(), joints);
                BoneNode {
                    id: BoneId(joint.index() as u32),
                    name: node_name(&joint),
                    parent: parent.map(|p| BoneId(p as u32)),
                    matrix: matrix.to_cols_array_2d(),
                }
            })
            .collect();
        graph.armatures.push(Armature {
            id: armature_id,
            name: name.clone(),
            bones,
        });

        let action = document
            .animations()
            .find(|anim| {
                anim.channels()
                    .any(|c| joints.contains(&c.target().node().index()))
            })
            .map(|anim| convert_animation(&anim, buffers, joints, ActionId(skin.index() as u32), fps))
            .transpose()?;
        let action_id = action.as_ref().map(|a| a.id);
        graph.actions.extend(action);

        let id = ObjectId((node_count + skin.index()) as u32);
        graph.objects.push(Object {
            id,
            name,
            kind: ObjectKind::Armature,
            data: Some(armature_id),
            animation: Some(AnimationData { action: action_id }),
        });
        membership.push((id, joints.iter().copied().collect()));
    }

    let mut scenes: Vec<Scene> = document
        .scenes()
        .map(|scene| {
            let reachable = hierarchy.reachable(scene.nodes().map(|n| n.index()));
            Scene {
                name: scene
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Scene_{}", scene.index())),
                fps,
                objects: membership
                    .iter()
                    .filter(|(_, nodes)| nodes.iter().any(|n| reachable.contains(n)))
                    .map(|(id, _)| *id)
                    .collect(),
            }
        })
        .collect();

    if scenes.is_empty() {
        scenes.push(Scene {
            name: "Scene".to_string(),
            fps,
            objects: membership.iter().map(|(id, _)| *id).collect(),
        });
    }
    graph.scenes = scenes;

    Ok(graph)
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}

/// Node tree flattened into index tables
struct Hierarchy {
    locals: Vec<Mat4>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl Hierarchy {
    fn new(document: &gltf::Document) -> Self {
        let locals: Vec<Mat4> = document
            .nodes()
            .map(|n| Mat4::from_cols_array_2d(&n.transform().matrix()))
            .collect();
        let mut parents = vec![None; locals.len()];
        let mut children = vec![Vec::new(); locals.len()];

        for node in document.nodes() {
            for child in node.children() {
                parents[child.index()] = Some(node.index());
                children[node.index()].push(child.index());
            }
        }

        Self {
            locals,
            parents,
            children,
        }
    }

    /// Nearest ancestor joint of `index` and the transform into its space.
    ///
    /// Non-joint nodes between a joint and its parent joint are folded into
    /// the local matrix. Root joints keep their own local matrix.
    fn joint_local(&self, index: usize, joints: &HashSet<usize>) -> (Option<usize>, Mat4) {
        let mut between = Mat4::IDENTITY;
        let mut current = self.parents[index];

        while let Some(parent) = current {
            if joints.contains(&parent) {
                return (Some(parent), between * self.locals[index]);
            }
            between = self.locals[parent] * between;
            current = self.parents[parent];
        }

        (None, self.locals[index])
    }

    fn reachable(&self, roots: impl Iterator<Item = usize>) -> HashSet<usize> {
        let mut seen = HashSet::new();
        let mut stack: Vec<usize> = roots.collect();
        while let Some(node) = stack.pop() {
            if seen.insert(node) {
                stack.extend(self.children[node].iter().copied());
            }
        }
        seen
    }
}

/// Sampler output for one channel, one row per key
struct Samples {
    /// Key times in seconds
    times: Vec<f32>,
    values: Vec<Vec<f32>>,
    /// (in, out) tangents for cubic splines
    tangents: Option<(Vec<Vec<f32>>, Vec<Vec<f32>>)>,
    interpolation: GltfInterpolation,
}

fn convert_animation(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    joints: &HashSet<usize>,
    id: ActionId,
    fps: f32,
) -> Result<ActionData> {
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", animation.index()));

    let mut groups: Vec<GroupData> = Vec::new();
    let mut group_of: HashMap<usize, usize> = HashMap::new();
    let mut frame_min = f32::INFINITY;
    let mut frame_max = f32::NEG_INFINITY;

    for channel in animation.channels() {
        let target = channel.target().node();
        if !joints.contains(&target.index()) {
            tracing::warn!(
                "Animation '{}' targets non-joint node '{}'; channel skipped",
                name,
                node_name(&target)
            );
            continue;
        }

        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
        let times: Vec<f32> = reader
            .read_inputs()
            .with_context(|| format!("Animation '{}' has a channel without key times", name))?
            .collect();
        let outputs = reader
            .read_outputs()
            .with_context(|| format!("Animation '{}' has a channel without values", name))?;

        let (property, rows): (&str, Vec<Vec<f32>>) = match outputs {
            ReadOutputs::Translations(iter) => ("location", iter.map(|v| v.to_vec()).collect()),
            ReadOutputs::Rotations(rotations) => (
                "rotation_quaternion",
                rotations
                    .into_f32()
                    .map(|[x, y, z, w]| vec![w, x, y, z])
                    .collect(),
            ),
            ReadOutputs::Scales(iter) => ("scale", iter.map(|v| v.to_vec()).collect()),
            ReadOutputs::MorphTargetWeights(_) => {
                tracing::debug!("Animation '{}': morph target weights skipped", name);
                continue;
            }
        };

        let samples = Samples::new(times, rows, channel.sampler().interpolation())
            .with_context(|| format!("Animation '{}' has malformed {} samples", name, property))?;

        for &t in &samples.times {
            frame_min = frame_min.min(t * fps);
            frame_max = frame_max.max(t * fps);
        }

        let bone = node_name(&target);
        let group_index = *group_of.entry(target.index()).or_insert_with(|| {
            groups.push(GroupData {
                name: bone.clone(),
                channels: Vec::new(),
            });
            groups.len() - 1
        });

        let data_path = format!("pose.bones[\"{}\"].{}", bone, property);
        for component in 0..samples.width() {
            groups[group_index].channels.push(FCurve {
                data_path: data_path.clone(),
                array_index: component as u32,
                keyframe_points: samples.keyframes(component, fps),
            });
        }
    }

    let frame_range = if frame_min <= frame_max {
        [frame_min, frame_max]
    } else {
        [0.0, 0.0]
    };

    Ok(ActionData {
        id,
        name,
        frame_range,
        groups,
    })
}

impl Samples {
    fn new(
        times: Vec<f32>,
        rows: Vec<Vec<f32>>,
        interpolation: GltfInterpolation,
    ) -> Result<Self> {
        if interpolation == GltfInterpolation::CubicSpline {
            if rows.len() != times.len() * 3 {
                anyhow::bail!(
                    "cubic spline needs 3 outputs per key, got {} for {} keys",
                    rows.len(),
                    times.len()
                );
            }
            let mut ins = Vec::with_capacity(times.len());
            let mut values = Vec::with_capacity(times.len());
            let mut outs = Vec::with_capacity(times.len());
            for triple in rows.chunks_exact(3) {
                ins.push(triple[0].clone());
                values.push(triple[1].clone());
                outs.push(triple[2].clone());
            }
            return Ok(Self {
                times,
                values,
                tangents: Some((ins, outs)),
                interpolation,
            });
        }

        if rows.len() != times.len() {
            anyhow::bail!("{} outputs for {} keys", rows.len(), times.len());
        }
        Ok(Self {
            times,
            values: rows,
            tangents: None,
            interpolation,
        })
    }

    fn width(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Keyframe points of one component.
    ///
    /// Cubic spline tangents become free Bezier handles one third of the way
    /// to the neighbouring keys; linear and step keys get vector handles
    /// pointing at their neighbours.
    fn keyframes(&self, component: usize, fps: f32) -> Vec<KeyframePoint> {
        let count = self.times.len();
        let frame = |k: usize| self.times[k] * fps;
        let value = |k: usize| self.values[k][component];

        (0..count)
            .map(|k| {
                let (f, v) = (frame(k), value(k));
                let prev = k.checked_sub(1);
                let next = (k + 1 < count).then_some(k + 1);

                let (interpolation, handle_kind, left, right) = match &self.tangents {
                    Some((ins, outs)) => {
                        let left = prev.map_or([f, v], |p| {
                            let dt = self.times[k] - self.times[p];
                            [f - (f - frame(p)) / 3.0, v - ins[k][component] * dt / 3.0]
                        });
                        let right = next.map_or([f, v], |n| {
                            let dt = self.times[n] - self.times[k];
                            [f + (frame(n) - f) / 3.0, v + outs[k][component] * dt / 3.0]
                        });
                        (Interpolation::Bezier, HandleKind::Free, left, right)
                    }
                    None => {
                        let toward = |n: usize| [f + (frame(n) - f) / 3.0, v + (value(n) - v) / 3.0];
                        let interpolation = match self.interpolation {
                            GltfInterpolation::Step => Interpolation::Constant,
                            _ => Interpolation::Linear,
                        };
                        (
                            interpolation,
                            HandleKind::Vector,
                            prev.map_or([f, v], toward),
                            next.map_or([f, v], toward),
                        )
                    }
                };

                let mut point = KeyframePoint::new(f, v, interpolation);
                point.handle_left = left;
                point.handle_left_type = handle_kind;
                point.handle_right = right;
                point.handle_right_type = handle_kind;
                point
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_samples_get_vector_handles() {
        let samples = Samples::new(
            vec![0.0, 1.0],
            vec![vec![0.0], vec![3.0]],
            GltfInterpolation::Linear,
        )
        .unwrap();

        let keys = samples.keyframes(0, 24.0);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].co, [0.0, 0.0]);
        assert_eq!(keys[1].co, [24.0, 3.0]);
        assert_eq!(keys[0].interpolation, Interpolation::Linear);
        assert_eq!(keys[0].handle_right, [8.0, 1.0]);
        assert_eq!(keys[0].handle_left, [0.0, 0.0]);
        assert_eq!(keys[1].handle_left, [16.0, 2.0]);
        assert_eq!(keys[1].handle_right_type, HandleKind::Vector);
    }

    #[test]
    fn test_step_maps_to_constant() {
        let samples =
            Samples::new(vec![0.0], vec![vec![1.0]], GltfInterpolation::Step).unwrap();
        assert_eq!(samples.keyframes(0, 30.0)[0].interpolation, Interpolation::Constant);
    }

    #[test]
    fn test_cubic_spline_tangents_become_bezier_handles() {
        // (in, value, out) per key
        let rows = vec![
            vec![0.0],
            vec![0.0],
            vec![3.0],
            vec![6.0],
            vec![2.0],
            vec![0.0],
        ];
        let samples = Samples::new(vec![0.0, 1.0], rows, GltfInterpolation::CubicSpline).unwrap();

        let keys = samples.keyframes(0, 30.0);
        assert_eq!(keys[0].interpolation, Interpolation::Bezier);
        assert_eq!(keys[0].handle_right, [10.0, 1.0]);
        assert_eq!(keys[1].co, [30.0, 2.0]);
        assert_eq!(keys[1].handle_left, [20.0, 0.0]);
        assert_eq!(keys[1].handle_left_type, HandleKind::Free);
    }

    #[test]
    fn test_malformed_cubic_spline_is_rejected() {
        let result = Samples::new(
            vec![0.0, 1.0],
            vec![vec![0.0], vec![1.0]],
            GltfInterpolation::CubicSpline,
        );
        assert!(result.is_err());
    }
}
