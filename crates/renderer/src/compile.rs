use std::borrow::Cow;

use anyhow::Result;
use playground::{ShaderCompileError, UniformName};
use wgpu::naga::front::glsl;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::ShaderStage;

/// User fragment shader after wrapping, checked by naga's GLSL front-end.
#[derive(Debug)]
pub struct CheckedFragment {
    /// Wrapped GLSL handed to wgpu.
    pub wrapped: String,
}

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Wraps `source` and runs naga's parser and validator over it.
///
/// The returned diagnostics are naga's own rendering of the error, with a
/// source excerpt. Line numbers refer to the wrapped shader.
pub fn check_fragment(source: &str) -> Result<CheckedFragment, ShaderCompileError> {
    let wrapped = wrap_fragment(source);

    let mut frontend = glsl::Frontend::default();
    let module = frontend
        .parse(&glsl::Options::from(ShaderStage::Fragment), &wrapped)
        .map_err(|errors| diagnostic(errors.emit_to_string(&wrapped)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|err| diagnostic(err.emit_to_string(&wrapped)))?;

    Ok(CheckedFragment { wrapped })
}

fn diagnostic(rendered: String) -> ShaderCompileError {
    ShaderCompileError::new(format!(
        "{}\nnote: subtract {} from line numbers to get lines of your shader",
        rendered.trim_end(),
        header_line_count()
    ))
}

/// Creates the wgpu module for an already checked fragment shader.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    fragment: &CheckedFragment,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fragpad fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(fragment.wrapped.clone()),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Produces a self-contained Vulkan GLSL fragment shader from WebGL-style
/// playground code.
///
/// 1. Drop `#version` and `precision` statements and the declarators of the
///    playground uniforms; the header owns those. Other statements sharing a
///    line with them are kept.
/// 2. Prepend [`HEADER`]: the uniform block, the colour output and macro
///    aliases for `u_*`, `gl_FragColor` and `gl_FragCoord`, plus a rename of
///    the user's `main`.
/// 3. Append [`FOOTER`], the real entry point, which flips `gl_FragCoord` to
///    a bottom-left origin before calling the user's `main`.
pub fn wrap_fragment(source: &str) -> String {
    let mut sanitized = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim_start();
        // one output line per input line keeps diagnostics aligned
        if !(trimmed.starts_with("#version") || trimmed.starts_with("precision ")) {
            for statement in line.split_inclusive(';') {
                match without_playground_uniforms(statement) {
                    Some(kept) => sanitized.push_str(&kept),
                    None => sanitized.push_str(statement),
                }
            }
        }
        sanitized.push('\n');
    }

    format!("{HEADER}{sanitized}{FOOTER}")
}

/// Number of lines [`HEADER`] adds ahead of the user's first line.
fn header_line_count() -> usize {
    HEADER.lines().count()
}

/// Rewrites a `uniform` declaration statement without its playground
/// declarators. `None` means the statement names none of them.
fn without_playground_uniforms(statement: &str) -> Option<String> {
    let body = statement.trim_start();
    let indent = &statement[..statement.len() - body.len()];
    let declaration = body.strip_prefix("uniform ")?.strip_suffix(';')?.trim();

    let mut type_words = Vec::new();
    let mut rest = declaration;
    loop {
        let (word, tail) = rest.split_once(char::is_whitespace)?;
        type_words.push(word);
        rest = tail.trim_start();
        if !matches!(word, "lowp" | "mediump" | "highp") {
            break;
        }
    }

    let declarators: Vec<&str> = rest.split(',').map(str::trim).collect();
    if !declarators.iter().any(|d| is_playground_declarator(d)) {
        return None;
    }
    let kept: Vec<&str> = declarators
        .into_iter()
        .filter(|d| !is_playground_declarator(d))
        .collect();
    if kept.is_empty() {
        return Some(indent.to_string());
    }
    Some(format!(
        "{indent}uniform {} {};",
        type_words.join(" "),
        kept.join(", ")
    ))
}

fn is_playground_declarator(declarator: &str) -> bool {
    let ident = declarator
        .split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .next()
        .unwrap_or_default();
    UniformName::ALL.iter().any(|name| name.glsl_name() == ident)
}

/// GLSL prologue injected ahead of every playground shader.
///
/// The block layout must match `PlaygroundUniforms` in `gpu/uniforms.rs`.
const HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 fragpad_color;

layout(std140, set = 0, binding = 0) uniform FragpadParams {
    float _u_time;
    vec2 _u_resolution;
    vec2 _u_mouse;
} fragpad;

#define u_time fragpad._u_time
#define u_resolution fragpad._u_resolution
#define u_mouse fragpad._u_mouse

vec4 fragpad_frag_coord;
#define gl_FragColor fragpad_color
#define gl_FragCoord fragpad_frag_coord
#define main fragpad_user_main
";

/// GLSL epilogue providing the real entry point.
const FOOTER: &str = r"#undef main
#undef gl_FragCoord
void main() {
    fragpad_frag_coord = vec4(gl_FragCoord.x, u_resolution.y - gl_FragCoord.y, gl_FragCoord.z, gl_FragCoord.w);
    fragpad_color = vec4(0.0, 0.0, 0.0, 1.0);
    fragpad_user_main();
}
";

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";
