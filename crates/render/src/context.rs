//! Adapter, device and queue setup
//!
//! Any failure here is fatal: there is no fallback renderer, so errors go
//! straight back to the caller and abort startup.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use winit::window::Window;

use crate::pipeline::ShaderError;
use crate::target::RenderTarget;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("surface has no supported texture format")]
    UnsupportedSurface,
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Device and queue shared by every GPU resource of the editor.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Context without a surface, rendering into offscreen targets only.
    pub fn headless() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();
        pollster::block_on(Self::request(instance, None))
    }

    /// Context able to present to `window`, plus the configured surface target.
    pub fn with_window(window: Arc<Window>) -> Result<(Self, RenderTarget), RenderError> {
        let instance = wgpu::Instance::default();
        let size = window.inner_size();
        let surface = instance.create_surface(window)?;
        let context = pollster::block_on(Self::request(instance, Some(&surface)))?;
        let target = RenderTarget::from_surface(&context, surface, size.width, size.height)?;
        Ok((context, target))
    }

    async fn request(
        instance: wgpu::Instance,
        surface: Option<&wgpu::Surface<'static>>,
    ) -> Result<Self, RenderError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("SDF Editor Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "GPU device ready"
        );

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }
}
