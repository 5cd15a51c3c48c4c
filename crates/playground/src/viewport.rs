use crate::bridge::ShaderBackend;
use crate::uniforms::UniformStore;

/// Physical pixel dimensions of the drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Keeps the surface and `u_resolution` in step with the container size.
#[derive(Debug, Default)]
pub struct ResizeHandler {
    current: Option<ViewportSize>,
}

impl ResizeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied size; `None` until the first non-empty resize.
    pub fn current(&self) -> Option<ViewportSize> {
        self.current
    }

    /// Applies `size` to the surface and the resolution uniform. Empty sizes
    /// (minimised windows) are skipped and reported as `false`.
    pub fn apply<B>(&mut self, size: ViewportSize, backend: &mut B, store: &mut UniformStore) -> bool
    where
        B: ShaderBackend + ?Sized,
    {
        if size.is_empty() {
            tracing::debug!(
                width = size.width,
                height = size.height,
                "ignoring empty viewport"
            );
            return false;
        }
        backend.resize(size.width, size.height);
        store.set_resolution(size.width as f32, size.height as f32);
        self.current = Some(size);
        tracing::debug!(width = size.width, height = size.height, "viewport resized");
        true
    }
}
