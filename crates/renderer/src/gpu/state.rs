use anyhow::{anyhow, Result};
use playground::{ShaderBackend, ShaderCompileError, UniformSnapshot};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;

use crate::compile::check_fragment;
use crate::types::Antialiasing;

use super::context::GpuContext;
use super::pipeline::{PipelineLayouts, ShaderPipeline};
use super::uniforms::PlaygroundUniforms;

/// wgpu rendering engine behind a playground session.
///
/// Holds at most one compiled pipeline. A failed compile leaves the previous
/// pipeline in place; until the first success nothing is drawn.
pub struct GpuState {
    context: GpuContext,
    layouts: PipelineLayouts,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: PlaygroundUniforms,
    current: Option<ShaderPipeline>,
    multisample_target: Option<MultisampleTarget>,
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: extent,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }

    fn for_context(context: &GpuContext) -> Option<Self> {
        (context.sample_count > 1).then(|| {
            Self::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        })
    }
}

impl GpuState {
    pub fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        antialiasing: Antialiasing,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, antialiasing)?;
        let layouts = PipelineLayouts::new(&context.device)?;

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<PlaygroundUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &layouts.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let uniforms = PlaygroundUniforms::new(context.size.width, context.size.height);
        let multisample_target = MultisampleTarget::for_context(&context);
        debug!(
            adapter = %context.adapter_name,
            sample_count = context.sample_count,
            "GPU state ready"
        );

        Ok(Self {
            context,
            layouts,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            current: None,
            multisample_target,
        })
    }

    fn build_pipeline(&self, source: &str) -> Result<ShaderPipeline, ShaderCompileError> {
        let fragment = check_fragment(source)?;

        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = ShaderPipeline::new(
            device,
            &self.layouts,
            self.context.surface_format,
            self.context.sample_count,
            &fragment,
        );
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderCompileError::new(err.to_string()));
        }
        Ok(pipeline)
    }

    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.context.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out acquiring the next frame");
                Ok(None)
            }
            Err(err) => Err(anyhow!("failed to acquire frame: {err}")),
        }
    }
}

impl ShaderBackend for GpuState {
    fn compile(&mut self, source: &str) -> Result<(), ShaderCompileError> {
        let pipeline = self.build_pipeline(source)?;
        self.current = Some(pipeline);
        Ok(())
    }

    fn draw(&mut self, snapshot: &UniformSnapshot) -> Result<()> {
        let Some(frame) = self.acquire_frame()? else {
            return Ok(());
        };

        self.uniforms.apply(snapshot);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if let Some(current) = self.current.as_ref() {
                render_pass.set_pipeline(&current.pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(PhysicalSize::new(width, height));
        self.multisample_target = MultisampleTarget::for_context(&self.context);
    }
}
