use bytemuck::{Pod, Zeroable};
use playground::UniformSnapshot;

/// CPU mirror of the `FragpadParams` std140 block injected by
/// `compile::wrap_fragment`.
///
/// `float` sits at offset 0, the two `vec2`s at 8 and 16, and the block is
/// padded out to 32 bytes.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlaygroundUniforms {
    pub u_time: f32,
    pub _padding0: f32,
    pub u_resolution: [f32; 2],
    pub u_mouse: [f32; 2],
    pub _padding1: [f32; 2],
}

unsafe impl Zeroable for PlaygroundUniforms {}
unsafe impl Pod for PlaygroundUniforms {}

impl PlaygroundUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            u_time: 0.0,
            _padding0: 0.0,
            u_resolution: [width as f32, height as f32],
            u_mouse: [0.0; 2],
            _padding1: [0.0; 2],
        }
    }

    pub fn apply(&mut self, snapshot: &UniformSnapshot) {
        self.u_time = snapshot.time;
        self.u_resolution = snapshot.resolution;
        self.u_mouse = snapshot.mouse;
    }
}

impl From<&UniformSnapshot> for PlaygroundUniforms {
    fn from(snapshot: &UniformSnapshot) -> Self {
        let mut uniforms = Self::new(0, 0);
        uniforms.apply(snapshot);
        uniforms
    }
}
