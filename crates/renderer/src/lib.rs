//! wgpu/winit host for the fragpad playground.
//!
//! The crate supplies the native collaborators a [`playground::Session`]
//! needs and drives it from a winit event loop:
//!
//! ```text
//!   file watcher ──EditNotifier──▶ event loop ──▶ Session::edit
//!                                      │
//!                                      ├─ AboutToWait ──▶ Session::poll_timers ──▶ GpuState::compile
//!                                      ├─ RedrawRequested ──▶ Session::tick ──▶ GpuState::draw
//!                                      ├─ Resized / CursorMoved ──▶ Session::resize / pointer_moved
//!                                      └─ Ctrl+S ──▶ Session::export
//! ```
//!
//! Shaders are written in WebGL style (`gl_FragColor`, `u_time`, ...) and are
//! wrapped by [`compile::wrap_fragment`] into Vulkan GLSL before naga and wgpu
//! see them. [`check_fragment`] runs the same front-end without a GPU.

pub mod compile;
mod gpu;
mod overlay;
mod types;
mod window;

use anyhow::Result;
use playground::TextDocument;

pub use compile::{check_fragment, wrap_fragment, CheckedFragment};
pub use gpu::GpuState;
pub use overlay::TitleOverlay;
pub use types::{Antialiasing, WindowConfig};
pub use window::{EditNotifier, ExportHandlers, PlaygroundEvent};

/// Entry point that owns the window configuration.
pub struct Playground {
    config: WindowConfig,
}

impl Playground {
    pub fn new(config: WindowConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks until it is closed.
    pub fn run<D, F>(self, open_document: F, export: ExportHandlers) -> Result<()>
    where
        D: TextDocument + 'static,
        F: FnOnce(EditNotifier) -> Result<D>,
    {
        tracing::info!(
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            antialiasing = ?self.config.antialiasing,
            "opening playground window"
        );
        window::run_window(self.config, open_document, export)
    }
}
