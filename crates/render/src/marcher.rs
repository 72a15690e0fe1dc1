//! Ray marcher: renders the scene and resolves picks on the GPU.
//!
//! A frame is one submission:
//!
//! 1. Frame uniforms and the camera are uploaded.
//! 2. If a pick was requested and no readback is pending, the picking flag is
//!    raised for this frame only and the hit buffer is cleared.
//! 3. The fullscreen pass shades every pixel; the pixel under the pointer
//!    additionally writes the hit record.
//! 4. The hit record is copied to staging and mapped after submission.
//!
//! The highlight of a newly picked object shows up once the caller has read
//! the pick back and selected it, so it trails the click by at least one
//! frame.

use std::sync::Arc;

use glam::Vec2;
use scene::{HitResult, MarchSettings};
use tracing::{debug, info};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::context::{GpuContext, RenderError};
use crate::gpu_types::FrameUniforms;
use crate::object_buffer::GpuObjectBuffer;
use crate::picking::PickReadback;
use crate::pipeline::{self, BindGroupBuffers, ShaderError};
use crate::registry::ObjectRegistry;
use crate::uniforms::{FrameState, UniformPatch};

/// What happened to the pending pick request during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickDispatch {
    NoRequest,
    Issued,
    /// A readback was still in flight, so the request was discarded.
    Dropped,
}

pub struct RayMarcher {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    format: wgpu::TextureFormat,
    registry: ObjectRegistry<GpuObjectBuffer>,
    frame: FrameState,
    frame_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    picking: PickReadback,
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    bound_generation: u64,
    pick_request: Option<Vec2>,
}

impl RayMarcher {
    /// Build every GPU resource for a target of the given color format.
    pub fn new(context: &GpuContext, format: wgpu::TextureFormat, capacity: usize) -> Result<Self, RenderError> {
        let device = Arc::clone(&context.device);
        let queue = Arc::clone(&context.queue);

        let frame = FrameState::default();
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniforms"),
            contents: bytemuck::bytes_of(&frame.to_gpu()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<crate::gpu_types::CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let registry = ObjectRegistry::new(GpuObjectBuffer::new(Arc::clone(&device), Arc::clone(&queue), capacity));
        let picking = PickReadback::new(&device);
        let layout = pipeline::create_bind_group_layout(&device);
        let pipeline = pipeline::create_render_pipeline(&device, &layout, format, pipeline::SHADER_SOURCE)?;
        let bind_group = pipeline::create_bind_group(
            &device,
            &layout,
            &BindGroupBuffers {
                frame: &frame_buffer,
                camera: &camera_buffer,
                counts: registry.buffer().counts_buffer(),
                objects: registry.buffer().buffer(),
                hit: picking.hit_buffer(),
            },
        );
        let bound_generation = registry.buffer().generation();

        info!(?format, capacity, "ray marcher ready");
        Ok(Self {
            device,
            queue,
            format,
            registry,
            frame,
            frame_buffer,
            camera_buffer,
            picking,
            layout,
            pipeline,
            bind_group,
            bound_generation,
            pick_request: None,
        })
    }

    pub fn registry(&self) -> &ObjectRegistry<GpuObjectBuffer> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ObjectRegistry<GpuObjectBuffer> {
        &mut self.registry
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Merge a partial uniform update; uploaded with the next frame.
    pub fn apply(&mut self, patch: &UniformPatch) {
        self.frame.apply(patch);
    }

    pub fn set_march_settings(&mut self, render: MarchSettings, pick: MarchSettings) {
        self.frame.apply(&UniformPatch::default().march_settings(render, pick));
    }

    /// Resolve the pixel at `position` during the next frame.
    ///
    /// A newer request replaces one that has not been rendered yet.
    pub fn request_pick(&mut self, position: Vec2) {
        self.pick_request = Some(position);
    }

    pub fn pick_pending(&self) -> bool {
        self.picking.is_pending()
    }

    /// Replace the shader. On error the current pipeline stays in use.
    pub fn reload_shader(&mut self, source: &str) -> Result<(), ShaderError> {
        self.pipeline = pipeline::create_render_pipeline(&self.device, &self.layout, self.format, source)?;
        debug!("pipeline rebuilt from new shader source");
        Ok(())
    }

    /// Draw one frame into `view` and submit it.
    pub fn render(&mut self, camera: &Camera, view: &wgpu::TextureView) -> PickDispatch {
        self.rebind_if_grown();

        let dispatch = match self.pick_request.take() {
            Some(position) if self.picking.begin(&self.queue) => {
                self.frame.apply(&UniformPatch::default().mouse(position).picking(true));
                PickDispatch::Issued
            }
            Some(position) => {
                debug!(x = position.x, y = position.y, "pick request dropped");
                PickDispatch::Dropped
            }
            None => PickDispatch::NoRequest,
        };
        let picking = dispatch == PickDispatch::Issued;

        self.frame.active_index = self.registry.active_index();
        let uniforms: FrameUniforms = self.frame.to_gpu();
        self.queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera.uniform()));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("SDF Frame") });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("SDF Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        if picking {
            self.picking.encode_copy(&mut encoder);
        }
        self.queue.submit(Some(encoder.finish()));

        if picking {
            self.picking.begin_map();
            self.frame.picking = false;
        }
        dispatch
    }

    /// Non-blocking check for a finished pick readback.
    pub fn poll_pick(&mut self) -> Option<HitResult> {
        self.device.poll(wgpu::Maintain::Poll);
        self.picking.collect()
    }

    /// Block until the in-flight pick readback completes.
    pub fn read_pick_blocking(&mut self) -> Option<HitResult> {
        self.picking.read_blocking(&self.device)
    }

    /// Result of the most recent completed pick.
    pub fn last_pick(&self) -> HitResult {
        self.picking.latest()
    }

    fn rebind_if_grown(&mut self) {
        let generation = self.registry.buffer().generation();
        if generation == self.bound_generation {
            return;
        }
        self.bind_group = pipeline::create_bind_group(
            &self.device,
            &self.layout,
            &BindGroupBuffers {
                frame: &self.frame_buffer,
                camera: &self.camera_buffer,
                counts: self.registry.buffer().counts_buffer(),
                objects: self.registry.buffer().buffer(),
                hit: self.picking.hit_buffer(),
            },
        );
        self.bound_generation = generation;
        debug!(generation, "bind group rebuilt for grown object buffer");
    }
}
