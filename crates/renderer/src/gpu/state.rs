use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, info};
use wgpu::util::DeviceExt;

use crate::error::RendererError;
use crate::frame::{DrawError, FrameInputs, FrameTarget, FrameUniforms, Viewport};
use crate::geometry::Geometry;
use crate::program::{LinkedProgram, PARAMS_BINDING};

use super::context::GpuContext;
use super::pipeline::GpuProgram;
use super::uniforms::ProgramUniforms;

/// Owns every GPU object of a run.
///
/// Fields drop in declaration order: program objects and buffers go first,
/// the device and surface last.
pub(crate) struct GpuState {
    params_bind_group: wgpu::BindGroup,
    params_buffer: wgpu::Buffer,
    geometry: Geometry,
    program: GpuProgram,
    context: GpuContext,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: T,
        initial: Viewport,
        program: LinkedProgram,
    ) -> Result<Self, RendererError>
    where
        T: HasDisplayHandle + HasWindowHandle + Send + Sync + 'static,
    {
        let context = GpuContext::new(target, initial)
            .map_err(|err| RendererError::Context(format!("{err:#}")))?;
        let program = GpuProgram::new(&context.device, context.surface_format, program)?;
        let geometry = Geometry::upload(&context.device);

        let params_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("params"),
                contents: bytemuck::bytes_of(&ProgramUniforms::from(FrameUniforms {
                    resolution: [initial.width as f32, initial.height as f32],
                    time: 0.0,
                })),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let params_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("params bind group"),
            layout: &program.params_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: PARAMS_BINDING,
                resource: params_buffer.as_entire_binding(),
            }],
        });

        info!(
            width = initial.width,
            height = initial.height,
            format = ?context.surface_format,
            "GPU state ready"
        );

        Ok(Self {
            params_bind_group,
            params_buffer,
            geometry,
            program,
            context,
        })
    }

    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>, DrawError> {
        match self.context.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                Err(DrawError::Fatal("surface out of memory".to_string()))
            }
            Err(other) => Err(DrawError::Dropped(format!("surface error: {other}"))),
        }
    }
}

impl FrameTarget for GpuState {
    /// Uploads the uniforms, clears, draws the quad into the viewport and presents.
    fn draw(&mut self, inputs: &FrameInputs) -> Result<(), DrawError> {
        if inputs.viewport.is_empty() {
            return Ok(());
        }
        if self.context.size() != inputs.viewport {
            self.context.resize(inputs.viewport);
        }

        let Some(frame) = self.acquire_frame()? else {
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.context.queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&ProgramUniforms::from(inputs.uniforms)),
        );

        let surface = self.context.size();
        let width = inputs.viewport.width.min(surface.width);
        let height = inputs.viewport.height.min(surface.height);

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            pass.set_pipeline(&self.program.pipeline);
            pass.set_bind_group(0, &self.params_bind_group, &[]);
            self.geometry.draw(&mut pass);
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
