//! Renderer crate for Shaker, a fragment-shader preview harness.
//!
//! The crate compiles a user fragment shader body against a fixed harness
//! vertex shader, links the two, and draws the result on a full-screen quad
//! in a `winit` window. The overall flow is:
//!
//! ```text
//!   CLI (shaker)
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ prepare() ──▶ load ─▶ assemble ─▶ compile ─▶ link
//!          │
//!          └─▶ window::run ──▶ FrameDriver::run ──▶ GpuState::draw
//!                                    │
//!                                    └─▶ FrameState::uniforms() ─▶ GPU UBO
//! ```
//!
//! Everything up to and including the interface half of linking happens on
//! the CPU with `naga`, before a window exists. Only pipeline creation needs
//! a device, and its validation errors are reported as link failures too.

mod compile;
mod error;
mod frame;
mod geometry;
mod gpu;
mod program;
mod runtime;
mod source;
mod types;
mod window;

use tracing::info;

pub use compile::{
    assemble_fragment, compile_stage, CompiledStage, StageKind, FRAGMENT_PREAMBLE,
    VERTEX_SHADER_GLSL,
};
pub use error::RendererError;
pub use frame::{
    DrawError, DriverPhase, EventSource, FrameDriver, FrameInputs, FrameState, FrameTarget,
    FrameUniforms, InputEvent, Viewport,
};
pub use geometry::{QUAD_INDICES, QUAD_VERTICES};
pub use gpu::ProgramUniforms;
pub use program::{build, link, BuildError, LinkedProgram};
pub use runtime::{FrameClock, ManualClock, SystemClock};
pub use source::load_fragment_source;
pub use types::{FramePacing, RendererConfig, DEFAULT_SURFACE_SIZE, DEFAULT_TARGET_FPS};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Loads, assembles, compiles and links the configured shader.
    ///
    /// Needs no window or GPU, so every shader error surfaces here before
    /// any platform resource is acquired.
    pub fn prepare(&self) -> Result<LinkedProgram, RendererError> {
        let body = load_fragment_source(&self.config.shader_source)?;
        let fragment = assemble_fragment(&body);
        let program = program::build(VERTEX_SHADER_GLSL, &fragment)?;
        info!(
            path = %self.config.shader_source.display(),
            "shader program linked"
        );
        Ok(program)
    }

    /// Prepares the program, then opens the preview window and renders until
    /// the user closes it or presses Escape.
    pub fn run(&mut self) -> Result<(), RendererError> {
        let program = self.prepare()?;
        window::run(&self.config, program)
    }
}
