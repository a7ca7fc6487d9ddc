//! Bone hierarchy resolution and bind-pose export
//!
//! Parent links are stored as bone ids; the interchange format wants indices
//! into the emitted bone list. Indices are positional, so the output list
//! keeps the armature's bone order exactly.

use anim_shared::Bone;
use hashbrown::HashMap;

use crate::error::{ExportError, ExportResult};
use crate::scene::{Armature, BoneId};
use crate::transform;

/// One row of resolver input
#[derive(Debug, Clone, Copy)]
pub struct BoneEntry<'a> {
    pub name: &'a str,
    pub id: BoneId,
    pub parent: Option<BoneId>,
}

/// Map each entry's parent id to its position in `entries`.
///
/// A missing parent, or one that is not part of `entries`, resolves to `None`
/// (written as `-1`). Lookup is by id, never by name.
pub fn resolve_parents(armature: &str, entries: &[BoneEntry<'_>]) -> ExportResult<Vec<Option<usize>>> {
    let mut index_of: HashMap<BoneId, usize> = HashMap::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if index_of.insert(entry.id, index).is_some() {
            return Err(ExportError::DuplicateBoneId {
                armature: armature.to_string(),
                bone: entry.id,
            });
        }
    }

    entries
        .iter()
        .map(|entry| {
            let Some(parent) = entry.parent else {
                return Ok(None);
            };
            if parent == entry.id {
                return Err(ExportError::SelfParentedBone {
                    armature: armature.to_string(),
                    bone: entry.name.to_string(),
                });
            }
            Ok(index_of.get(&parent).copied())
        })
        .collect()
}

/// Bind-pose records for every bone of `armature`, in armature order
pub fn export_bones(armature: &Armature) -> ExportResult<Vec<Bone>> {
    let entries: Vec<BoneEntry<'_>> = armature
        .bones
        .iter()
        .map(|bone| BoneEntry {
            name: &bone.name,
            id: bone.id,
            parent: bone.parent,
        })
        .collect();

    let parents = resolve_parents(&armature.name, &entries)?;

    armature
        .bones
        .iter()
        .zip(parents)
        .map(|(bone, parent)| {
            let trs = transform::decompose(&bone.matrix).map_err(|e| {
                ExportError::NonDecomposableTransform {
                    bone: bone.name.clone(),
                    reason: e.to_string(),
                }
            })?;

            Ok(Bone {
                name: bone.name.clone(),
                parent,
                translation: trs.translation,
                rotation: trs.rotation,
                scale: trs.scale,
            })
        })
        .collect()
}
