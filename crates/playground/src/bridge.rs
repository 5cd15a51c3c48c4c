use crate::uniforms::UniformSnapshot;

/// Diagnostic reported when the rendering engine rejects a shader.
///
/// The log text is kept verbatim; nothing downstream parses it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("shader failed to compile:\n{log}")]
pub struct ShaderCompileError {
    pub log: String,
}

impl ShaderCompileError {
    pub fn new(log: impl Into<String>) -> Self {
        Self { log: log.into() }
    }
}

/// Rendering engine seam: owns the active shader program and the drawable
/// surface.
pub trait ShaderBackend {
    /// Compiles `source` and swaps it in. On error the previously active
    /// program must stay in place.
    fn compile(&mut self, source: &str) -> Result<(), ShaderCompileError>;

    /// Draws one full-screen frame with the active program.
    fn draw(&mut self, uniforms: &UniformSnapshot) -> anyhow::Result<()>;

    /// Resizes the drawable surface to `width` x `height` physical pixels.
    fn resize(&mut self, width: u32, height: u32);
}

/// Surface that displays compiler diagnostics to the user.
pub trait ErrorOverlay {
    fn show(&mut self, diagnostic: &str);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}

/// Forwards shader text to the backend and routes the outcome to the overlay.
#[derive(Debug, Default)]
pub struct CompilerBridge {
    active_source: String,
    attempts: u64,
    failures: u64,
}

impl CompilerBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to make `text` the running fragment shader.
    pub fn set_source<B, O>(
        &mut self,
        text: &str,
        backend: &mut B,
        overlay: &mut O,
    ) -> Result<(), ShaderCompileError>
    where
        B: ShaderBackend + ?Sized,
        O: ErrorOverlay + ?Sized,
    {
        self.attempts += 1;
        match backend.compile(text) {
            Ok(()) => {
                self.active_source.clear();
                self.active_source.push_str(text);
                overlay.hide();
                tracing::info!(
                    attempt = self.attempts,
                    bytes = text.len(),
                    "fragment shader compiled"
                );
                Ok(())
            }
            Err(err) => {
                self.failures += 1;
                overlay.show(&err.log);
                tracing::warn!(
                    attempt = self.attempts,
                    failures = self.failures,
                    "fragment shader rejected; keeping last good program"
                );
                Err(err)
            }
        }
    }

    /// Source of the program currently drawn.
    pub fn active_source(&self) -> &str {
        &self.active_source
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}
