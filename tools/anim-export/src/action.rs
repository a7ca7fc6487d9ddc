//! Action datablock -> interchange action

use anim_shared::{Action, ActionGroup};

use crate::curve::export_channel;
use crate::options::ExportOptions;
use crate::scene::ActionData;

/// Convert an action. The frame range is the stored one, not the keyframe
/// extent; group and channel order is preserved.
pub fn export_action(action: &ActionData, options: &ExportOptions) -> Action {
    let [frame_start, frame_end] = action.frame_range;

    let groups = action
        .groups
        .iter()
        .map(|group| ActionGroup {
            name: group.name.clone(),
            channels: group
                .channels
                .iter()
                .map(|curve| export_channel(curve, options))
                .collect(),
        })
        .collect();

    tracing::debug!(
        "Exported action '{}' ({} groups, frames {}..={})",
        action.name,
        action.groups.len(),
        frame_start,
        frame_end
    );

    Action {
        name: action.name.clone(),
        frame_start,
        frame_end,
        groups,
    }
}
