use crate::uniforms::UniformStore;

/// Maps window-space pointer positions to shader space (origin bottom-left).
#[derive(Debug, Default)]
pub struct PointerTracker {
    origin: (f64, f64),
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer tracker for a surface whose top-left corner sits at `origin`
    /// in client coordinates.
    pub fn with_origin(left: f64, top: f64) -> Self {
        Self { origin: (left, top) }
    }

    pub fn to_shader_space(&self, x: f64, y: f64, surface_height: f64) -> [f32; 2] {
        let local_x = x - self.origin.0;
        let local_y = y - self.origin.1;
        [local_x as f32, (surface_height - local_y) as f32]
    }

    /// Writes the converted position into `u_mouse`.
    pub fn handle_move(&self, x: f64, y: f64, surface_height: f64, store: &mut UniformStore) {
        let [mx, my] = self.to_shader_space(x, y, surface_height);
        store.set_mouse(mx, my);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_vertical_axis() {
        let tracker = PointerTracker::new();
        let mut store = UniformStore::new();
        tracker.handle_move(10.0, 30.0, 480.0, &mut store);
        assert_eq!(store.snapshot().mouse, [10.0, 450.0]);

        tracker.handle_move(0.0, 480.0, 480.0, &mut store);
        assert_eq!(store.snapshot().mouse, [0.0, 0.0]);
    }

    #[test]
    fn offsets_by_surface_origin() {
        let tracker = PointerTracker::with_origin(100.0, 50.0);
        assert_eq!(tracker.to_shader_space(110.0, 60.0, 200.0), [10.0, 190.0]);
    }
}
