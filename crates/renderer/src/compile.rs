//! Fixed GLSL sources and the per-stage compiler.
//!
//! The fragment program handed to the GPU is always [`FRAGMENT_PREAMBLE`]
//! followed by the user's file, byte for byte. The preamble owns the uniform
//! interface (`glx_Resolution`, `glx_Time`), the colour output
//! (`glx_FragColor`) and the `glx_FragCoord` alias, so user code must not
//! redeclare any of those names.
//!
//! Compilation goes through naga's GLSL frontend followed by the IR validator.
//! Both run on the CPU, so broken shaders are rejected before a window or GPU
//! device exists.

use std::fmt;

use tracing::debug;
use wgpu::naga;
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use crate::program::BuildError;

/// GLSL prologue injected ahead of every user fragment shader.
///
/// The uniform block layout must match [`ProgramUniforms`](crate::gpu::ProgramUniforms).
/// `#version 450` is the lowest version the naga frontend accepts; explicit
/// locations and a single declared colour output are what the harness relies on.
pub const FRAGMENT_PREAMBLE: &str = r"#version 450

layout(location = 0) out vec4 glx_FragColor;

layout(std140, set = 0, binding = 0) uniform ShakerParams {
    vec2 resolution;
    float time;
} shaker_params;

#define glx_Resolution shaker_params.resolution
#define glx_Time shaker_params.time
#define glx_FragCoord gl_FragCoord
";

/// Pass-through vertex shader for the full-screen quad.
pub const VERTEX_SHADER_GLSL: &str = r"#version 450

layout(location = 0) in vec3 shaker_position;

void main() {
    gl_Position = vec4(shaker_position.x, shaker_position.y, shaker_position.z, 1.0);
}
";

/// Prepends [`FRAGMENT_PREAMBLE`] to the user's fragment body.
pub fn assemble_fragment(user_body: &str) -> String {
    let mut source = String::with_capacity(FRAGMENT_PREAMBLE.len() + user_body.len());
    source.push_str(FRAGMENT_PREAMBLE);
    source.push_str(user_body);
    source
}

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// A single shader stage that parsed and validated cleanly.
///
/// Stages are consumed by [`link`](crate::program::link); nothing keeps them
/// around afterwards.
#[derive(Debug)]
pub struct CompiledStage {
    pub(crate) kind: StageKind,
    pub(crate) module: naga::Module,
    pub(crate) info: ModuleInfo,
}

impl CompiledStage {
    pub fn kind(&self) -> StageKind {
        self.kind
    }
}

/// Parses and validates `source` as a GLSL shader for `kind`.
///
/// On failure the compiler report is rendered against the full source text and
/// returned verbatim in [`BuildError::Compile`].
pub fn compile_stage(kind: StageKind, source: &str) -> Result<CompiledStage, BuildError> {
    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(kind.naga_stage()), source)
        .map_err(|errors| BuildError::Compile {
            stage: kind,
            log: non_empty_log(errors.emit_to_string(source), kind),
        })?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|error| BuildError::Compile {
            stage: kind,
            log: non_empty_log(error.emit_to_string(source), kind),
        })?;

    let has_entry_point = module
        .entry_points
        .iter()
        .any(|entry| entry.name == "main" && entry.stage == kind.naga_stage());
    if !has_entry_point {
        return Err(BuildError::Compile {
            stage: kind,
            log: format!("{kind} shader does not define `void main()`"),
        });
    }

    debug!(
        stage = %kind,
        globals = module.global_variables.len(),
        functions = module.functions.len(),
        "compiled shader stage"
    );

    Ok(CompiledStage { kind, module, info })
}

fn non_empty_log(log: String, kind: StageKind) -> String {
    if log.trim().is_empty() {
        format!("{kind} shader failed to compile (the compiler gave no diagnostic)")
    } else {
        log
    }
}
