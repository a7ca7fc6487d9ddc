//! Animation curve -> interchange channel

use anim_shared::{Channel, Handle, KeyFrame};

use crate::options::ExportOptions;
use crate::scene::{FCurve, KeyframePoint};

/// `"<last path segment>.<component>"`, e.g. `location.1` for
/// `pose.bones["Hand_L"].location` component 1.
pub fn channel_ref(data_path: &str, array_index: u32) -> String {
    let property = data_path.rsplit('.').next().unwrap_or(data_path);
    format!("{}.{}", property, array_index)
}

/// Convert one curve. Keyframes keep their stored order; nothing is sorted
/// or resampled, and handles are copied as-is.
pub fn export_channel(curve: &FCurve, options: &ExportOptions) -> Channel {
    Channel {
        channel_ref: channel_ref(&curve.data_path, curve.array_index),
        key_frames: curve
            .keyframe_points
            .iter()
            .map(|point| export_key_frame(point, options))
            .collect(),
    }
}

fn export_key_frame(point: &KeyframePoint, options: &ExportOptions) -> KeyFrame {
    let [time, value] = point.co;
    let details = options.keyframe_details;

    KeyFrame {
        time,
        value,
        interpolation: point.interpolation,
        handle_left: Handle {
            kind: point.handle_left_type,
            frame: point.handle_left[0],
            value: point.handle_left[1],
        },
        handle_right: Handle {
            kind: point.handle_right_type,
            frame: point.handle_right[0],
            value: point.handle_right[1],
        },
        keyframe_type: details.then_some(point.keyframe_type),
        easing: details.then_some(point.easing),
        amplitude: details.then_some(point.amplitude),
    }
}
