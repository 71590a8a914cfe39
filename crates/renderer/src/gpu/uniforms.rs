use bytemuck::{Pod, Zeroable};

use crate::frame::FrameUniforms;

/// std140 image of the `ShakerParams` block declared by the fragment preamble.
///
/// `vec2 resolution` sits at offset 0 and `float time` at offset 8; the block
/// is padded out to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ProgramUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub _padding: f32,
}

impl From<FrameUniforms> for ProgramUniforms {
    fn from(frame: FrameUniforms) -> Self {
        Self {
            resolution: frame.resolution,
            time: frame.time,
            _padding: 0.0,
        }
    }
}
