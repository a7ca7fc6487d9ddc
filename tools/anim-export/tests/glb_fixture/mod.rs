//! Programmatic GLB construction for glTF import tests.

use serde_json::{json, Value};

/// Rotation of `Hand` in the bind pose and of `Root` in the animation:
/// 90 degrees about +Z, glTF order (x, y, z, w)
pub const QUARTER_TURN_Z: [f32; 4] = [0.0, 0.0, std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2];

fn floats(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Camera, an `Armature` empty holding the joints `Root -> Hand`, and a
/// `Wave` animation:
/// - `Hand` translation, LINEAR, keys at 0s and 1s
/// - `Root` rotation, STEP, one key at 0.5s
pub fn wave_glb() -> Vec<u8> {
    let mut buffer = Vec::new();
    buffer.extend(floats(&[0.0, 1.0]));
    buffer.extend(floats(&[0.0, 0.5, 0.0, 1.0, 0.5, 0.0]));
    buffer.extend(floats(&[0.5]));
    buffer.extend(floats(&QUARTER_TURN_Z));

    let root = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "name": "Main", "nodes": [0, 1] }],
        "nodes": [
            { "name": "Camera", "camera": 0 },
            { "name": "Armature", "translation": [0.0, 0.0, 1.0], "children": [2] },
            { "name": "Root", "translation": [0.0, 1.0, 0.0], "children": [3] },
            { "name": "Hand", "translation": [0.0, 0.5, 0.0], "rotation": QUARTER_TURN_Z }
        ],
        "cameras": [{
            "type": "perspective",
            "perspective": { "yfov": 0.8, "znear": 0.1 }
        }],
        "skins": [{ "name": "Rig", "joints": [2, 3] }],
        "animations": [{
            "name": "Wave",
            "samplers": [
                { "input": 0, "output": 1, "interpolation": "LINEAR" },
                { "input": 2, "output": 3, "interpolation": "STEP" }
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 3, "path": "translation" } },
                { "sampler": 1, "target": { "node": 2, "path": "rotation" } }
            ]
        }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 1, "type": "SCALAR", "min": [0.5], "max": [0.5] },
            { "bufferView": 3, "componentType": 5126, "count": 1, "type": "VEC4" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 4 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 16 }
        ],
        "buffers": [{ "byteLength": 0 }]
    });

    assemble_glb(root, &buffer)
}

/// Assemble the final GLB binary
pub fn assemble_glb(mut root: Value, buffer_data: &[u8]) -> Vec<u8> {
    root["buffers"][0]["byteLength"] = json!(buffer_data.len());

    let json_string = serde_json::to_string(&root).expect("Failed to serialize JSON");
    let json_bytes = json_string.as_bytes();

    // Chunks are 4-byte aligned
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;

    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;
    let mut glb = Vec::with_capacity(total_length);

    // Header
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    // JSON chunk
    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding));

    // BIN chunk
    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes());
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, buffer_padding));

    glb
}
