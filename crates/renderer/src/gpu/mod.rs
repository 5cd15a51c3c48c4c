//! wgpu rendering engine for the playground.
//!
//! - `context` owns instance, device and surface wiring and reconfigures the
//!   swapchain on resize.
//! - `pipeline` turns a checked fragment shader into a render pipeline with a
//!   single uniform bind group.
//! - `uniforms` mirrors the injected `u_*` block.
//! - `state` glues everything together as a [`playground::ShaderBackend`].

mod context;
mod pipeline;
mod state;
mod uniforms;

pub use state::GpuState;
