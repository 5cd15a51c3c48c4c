use playground::SessionConfig;

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Immutable configuration for one playground window.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Initial inner size in physical pixels.
    pub surface_size: (u32, u32),
    /// Base window title; compile diagnostics are appended to it.
    pub title: String,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Debounce, time scale and export naming for the session.
    pub session: SessionConfig,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "fragpad".to_string(),
            antialiasing: Antialiasing::default(),
            session: SessionConfig::default(),
        }
    }
}
