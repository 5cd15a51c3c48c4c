/// Editor seam: whatever holds the shader text the user is working on.
pub trait TextDocument {
    /// Full current text.
    fn text(&self) -> anyhow::Result<String>;
}

/// In-memory document, edited through [`MemoryDocument::replace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    text: String,
}

impl MemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl TextDocument for MemoryDocument {
    fn text(&self) -> anyhow::Result<String> {
        Ok(self.text.clone())
    }
}

/// Fragment shader loaded when the user has not written one yet.
pub const DEFAULT_FRAGMENT_SHADER: &str = r"uniform float u_time;
uniform vec2 u_resolution;
uniform vec2 u_mouse;

void main() {
    // centre the view and keep square pixels
    vec2 uv = (gl_FragCoord.xy * 2.0 - u_resolution.xy) / min(u_resolution.x, u_resolution.y);

    float pulse = abs(sin(u_time * 0.1)) * 0.5;
    float d = distance(uv, vec2(0.0));
    vec3 color = vec3(0.5 / d) * pulse;

    gl_FragColor = vec4(color, 1.0);
}
";
