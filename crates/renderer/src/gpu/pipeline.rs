use std::borrow::Cow;

use tracing::debug;

use crate::geometry;
use crate::program::{BuildError, LinkedProgram, PARAMS_BINDING};

/// The linked program as the GPU sees it.
pub(crate) struct GpuProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub params_layout: wgpu::BindGroupLayout,
}

impl GpuProgram {
    /// Turns the CPU-linked modules into a render pipeline.
    ///
    /// Everything is created inside a validation error scope; anything the
    /// device rejects is reported as a link failure. The per-stage shader
    /// modules are dropped on return, once the pipeline holds them.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        program: LinkedProgram,
    ) -> Result<Self, BuildError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let LinkedProgram { vertex, fragment } = program;
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad vertex"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(vertex)),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("user fragment"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(fragment)),
        });

        let params_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("params layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: PARAMS_BINDING,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("program layout"),
            bind_group_layouts: &[&params_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("program"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[geometry::vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(BuildError::Link {
                log: error.to_string(),
            });
        }

        debug!(?surface_format, "created render pipeline");
        Ok(Self {
            pipeline,
            params_layout,
        })
    }
}
