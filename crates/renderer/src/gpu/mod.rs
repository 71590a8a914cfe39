//! GPU side of the harness.
//!
//! - `context` owns the wgpu instance/surface/device wiring and reconfigures
//!   the swapchain when the viewport changes size.
//! - `pipeline` finishes linking: the validated stage modules become one
//!   render pipeline, checked inside a validation error scope.
//! - `uniforms` is the std140 mirror of the preamble's parameter block.
//! - `state` glues everything together and implements the frame driver's
//!   draw callback.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
pub use uniforms::ProgramUniforms;
