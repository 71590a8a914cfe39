//! Program builder: compile both stages, then link them.
//!
//! Linking happens on the CPU first. The checks mirror what a GL linker and
//! the wgpu pipeline validator would reject for this harness:
//!
//! - the vertex stage consumes nothing but the quad position at location 0;
//! - every fragment varying is written by the vertex stage with the same type;
//! - the fragment stage writes exactly one `vec4` colour at location 0;
//! - the fragment stage reads no resource other than the parameter block at
//!   set 0, binding 0.
//!
//! The GPU half of linking lives in [`crate::gpu::pipeline`], which reports
//! any pipeline validation error as [`BuildError::Link`] too.

use thiserror::Error;
use tracing::debug;
use wgpu::naga::{self, AddressSpace, Binding, Handle, Scalar, TypeInner, VectorSize};

use crate::compile::{compile_stage, CompiledStage, StageKind};

/// Set/binding slot reserved for the `glx_Resolution`/`glx_Time` block.
pub const PARAMS_GROUP: u32 = 0;
pub const PARAMS_BINDING: u32 = 0;

/// Vertex attribute slot carrying the quad position.
pub const POSITION_LOCATION: u32 = 0;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("could not compile {stage} shader:\n{log}")]
    Compile { stage: StageKind, log: String },

    #[error("could not link vertex and fragment shaders:\n{log}")]
    Link { log: String },
}

/// The single linked program of a run.
///
/// Holds the validated modules until the GPU pipeline builder turns them into
/// a render pipeline.
#[derive(Debug)]
pub struct LinkedProgram {
    pub(crate) vertex: naga::Module,
    pub(crate) fragment: naga::Module,
}

/// Compiles the vertex and fragment sources and links them.
///
/// The vertex stage is compiled first so a broken harness constant is never
/// blamed on user code.
pub fn build(vertex_source: &str, fragment_source: &str) -> Result<LinkedProgram, BuildError> {
    let vertex = compile_stage(StageKind::Vertex, vertex_source)?;
    let fragment = compile_stage(StageKind::Fragment, fragment_source)?;
    link(vertex, fragment)
}

/// Links two compiled stages, consuming them.
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<LinkedProgram, BuildError> {
    if vertex.kind != StageKind::Vertex || fragment.kind != StageKind::Fragment {
        return Err(BuildError::Link {
            log: format!(
                "expected a vertex and a fragment stage, got {} and {}",
                vertex.kind, fragment.kind
            ),
        });
    }

    let mut problems = Vec::new();

    let vertex_io = StageIo::of(&vertex)?;
    let fragment_io = StageIo::of(&fragment)?;

    let position = TypeInner::Vector {
        size: VectorSize::Tri,
        scalar: Scalar::F32,
    };
    for input in &vertex_io.inputs {
        if input.location != POSITION_LOCATION || input.inner != position {
            problems.push(format!(
                "vertex input at location {} is not provided (only a vec3 position at location {POSITION_LOCATION} is bound)",
                input.location
            ));
        }
    }

    for input in &fragment_io.inputs {
        match vertex_io
            .outputs
            .iter()
            .find(|output| output.location == input.location)
        {
            Some(output) if output.inner == input.inner => {}
            Some(_) => problems.push(format!(
                "fragment input at location {} does not match the type written by the vertex stage",
                input.location
            )),
            None => problems.push(format!(
                "fragment input at location {} is never written by the vertex stage",
                input.location
            )),
        }
    }

    let colour = TypeInner::Vector {
        size: VectorSize::Quad,
        scalar: Scalar::F32,
    };
    match fragment_io.outputs.as_slice() {
        [only] if only.location == 0 && only.inner == colour => {}
        [] => problems.push("fragment stage declares no colour output".to_string()),
        outputs => problems.push(format!(
            "fragment stage must write exactly one vec4 colour at location 0 (found {} outputs)",
            outputs.len()
        )),
    }

    problems.extend(unbound_resources(&fragment));

    if !problems.is_empty() {
        return Err(BuildError::Link {
            log: problems.join("\n"),
        });
    }

    debug!(
        varyings = fragment_io.inputs.len(),
        "linked vertex and fragment stages"
    );

    Ok(LinkedProgram {
        vertex: vertex.module,
        fragment: fragment.module,
    })
}

#[derive(Debug, Clone, PartialEq)]
struct Varying {
    location: u32,
    inner: TypeInner,
}

#[derive(Debug, Default)]
struct StageIo {
    inputs: Vec<Varying>,
    outputs: Vec<Varying>,
}

impl StageIo {
    fn of(stage: &CompiledStage) -> Result<Self, BuildError> {
        let module = &stage.module;
        let entry = entry_point(stage)?;

        let mut io = StageIo::default();
        for argument in &entry.function.arguments {
            collect_locations(module, argument.ty, argument.binding.as_ref(), &mut io.inputs);
        }
        if let Some(result) = &entry.function.result {
            collect_locations(module, result.ty, result.binding.as_ref(), &mut io.outputs);
        }
        Ok(io)
    }
}

fn entry_point(stage: &CompiledStage) -> Result<&naga::EntryPoint, BuildError> {
    stage
        .module
        .entry_points
        .iter()
        .find(|entry| entry.name == "main")
        .ok_or_else(|| BuildError::Link {
            log: format!("{} stage has no `main` entry point", stage.kind),
        })
}

fn collect_locations(
    module: &naga::Module,
    ty: Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Varying {
            location: *location,
            inner: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn unbound_resources(fragment: &CompiledStage) -> Vec<String> {
    let Some(index) = fragment
        .module
        .entry_points
        .iter()
        .position(|entry| entry.name == "main")
    else {
        return Vec::new();
    };
    let usage = fragment.info.get_entry_point(index);

    let mut problems = Vec::new();
    for (handle, global) in fragment.module.global_variables.iter() {
        if usage[handle].is_empty() {
            continue;
        }
        let name = global.name.as_deref().unwrap_or("<unnamed>");
        match (&global.space, &global.binding) {
            (AddressSpace::Uniform, Some(binding))
                if binding.group == PARAMS_GROUP && binding.binding == PARAMS_BINDING => {}
            (_, Some(binding)) => problems.push(format!(
                "`{name}` is bound at set {} binding {} but the harness only provides the parameter block at set {PARAMS_GROUP} binding {PARAMS_BINDING}",
                binding.group, binding.binding
            )),
            (AddressSpace::PushConstant, None) => {
                problems.push(format!("push constant `{name}` is not provided by the harness"))
            }
            _ => {}
        }
    }
    problems
}
