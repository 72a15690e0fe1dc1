//! Where frames are drawn: a window surface or an offscreen texture.

use crate::context::{GpuContext, RenderError};

/// Offscreen color format. The shader gamma-corrects itself, so a linear
/// `Unorm` format keeps the output bytes as written.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub enum RenderTarget {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
        width: u32,
        height: u32,
    },
}

/// One acquired frame. Present it after submitting the draw.
pub struct Frame {
    pub view: wgpu::TextureView,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl Frame {
    pub fn present(self) {
        if let Some(texture) = self.surface_texture {
            texture.present();
        }
    }
}

impl RenderTarget {
    pub fn from_surface(
        context: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&context.device, &config);
        Ok(Self::Surface { surface, config })
    }

    pub fn offscreen(context: &GpuContext, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self::Offscreen {
            texture: create_offscreen(&context.device, width, height),
            width,
            height,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        match self {
            Self::Surface { config, .. } => config.format,
            Self::Offscreen { .. } => OFFSCREEN_FORMAT,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Surface { config, .. } => (config.width, config.height),
            Self::Offscreen { width, height, .. } => (*width, *height),
        }
    }

    /// Reconfigure for a new size. Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, device: &wgpu::Device, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        match self {
            Self::Surface { surface, config } => {
                config.width = new_width;
                config.height = new_height;
                surface.configure(device, config);
            }
            Self::Offscreen { texture, width, height } => {
                *texture = create_offscreen(device, new_width, new_height);
                *width = new_width;
                *height = new_height;
            }
        }
    }

    /// Reconfigure at the current size, after a lost surface.
    pub fn reconfigure(&mut self, device: &wgpu::Device) {
        let (width, height) = self.size();
        self.resize(device, width, height);
    }

    pub fn acquire(&self) -> Result<Frame, wgpu::SurfaceError> {
        match self {
            Self::Surface { surface, .. } => {
                let texture = surface.get_current_texture()?;
                let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
                Ok(Frame {
                    view,
                    surface_texture: Some(texture),
                })
            }
            Self::Offscreen { texture, .. } => Ok(Frame {
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
                surface_texture: None,
            }),
        }
    }
}

fn create_offscreen(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}
