//! Render pipeline creation and management
//!
//! One bind group carries everything the ray marcher reads:
//!
//! | binding | contents                      | kind                 |
//! |---------|-------------------------------|----------------------|
//! | 0       | [`FrameUniforms`]             | uniform              |
//! | 1       | [`CameraUniform`]             | uniform              |
//! | 2       | [`SceneCounts`]               | uniform              |
//! | 3       | array of [`ObjectRecord`]     | read-only storage    |
//! | 4       | [`HitRecord`]                 | read-write storage   |
//!
//! [`FrameUniforms`]: crate::gpu_types::FrameUniforms
//! [`CameraUniform`]: crate::gpu_types::CameraUniform
//! [`SceneCounts`]: crate::gpu_types::SceneCounts
//! [`ObjectRecord`]: crate::gpu_types::ObjectRecord
//! [`HitRecord`]: crate::gpu_types::HitRecord

use thiserror::Error;

/// WGSL source compiled into the binary.
pub const SHADER_SOURCE: &str = include_str!("sdf.wgsl");

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("WGSL parse error:\n{0}")]
    Parse(String),
    #[error("WGSL validation error: {0}")]
    Validation(String),
}

/// Parse and validate WGSL with naga before handing it to the device.
pub fn validate_wgsl(source: &str) -> Result<(), ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse(e.emit_to_string(source)))?;
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| ShaderError::Validation(e.to_string()))?;
    Ok(())
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("SDF Bind Group Layout"),
        entries: &[
            uniform_entry(0),
            uniform_entry(1),
            uniform_entry(2),
            storage_entry(3, true),
            storage_entry(4, false),
        ],
    })
}

/// Buffers referenced by the bind group.
pub struct BindGroupBuffers<'a> {
    pub frame: &'a wgpu::Buffer,
    pub camera: &'a wgpu::Buffer,
    pub counts: &'a wgpu::Buffer,
    pub objects: &'a wgpu::Buffer,
    pub hit: &'a wgpu::Buffer,
}

pub fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffers: &BindGroupBuffers<'_>,
) -> wgpu::BindGroup {
    let entries = [buffers.frame, buffers.camera, buffers.counts, buffers.objects, buffers.hit]
        .into_iter()
        .enumerate()
        .map(|(binding, buffer)| wgpu::BindGroupEntry {
            binding: binding as u32,
            resource: buffer.as_entire_binding(),
        })
        .collect::<Vec<_>>();
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("SDF Bind Group"),
        layout,
        entries: &entries,
    })
}

/// Create the ray marching pipeline: a fullscreen triangle whose fragment
/// stage marches one ray per pixel.
pub fn create_render_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    source: &str,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    validate_wgsl(source)?;
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("SDF Shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("SDF Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("SDF Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    }))
}
