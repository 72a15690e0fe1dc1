//! Windowed event loop
//!
//! Maps winit events onto [`Engine`] calls. Redraws are requested from
//! `AboutToWait` and presented with FIFO, so frames follow the display.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::Vec2;
use render::GpuContext;
use scene::Primitive;
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::config::EditorConfig;
use crate::engine::Engine;
use crate::input::PointerButton;

/// Pixels of touchpad scroll treated as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 50.0;

#[derive(Default)]
pub struct RunOptions {
    /// Start with one of each primitive.
    pub demo: bool,
    /// Paths of changed shader files, read and swapped in between frames.
    pub shader_updates: Option<Receiver<PathBuf>>,
}

pub fn run(config: EditorConfig, options: RunOptions) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let (context, target) = GpuContext::with_window(Arc::clone(&window)).context("failed to initialise GPU")?;
    let mut engine = Engine::new(context, target, &config).context("failed to build ray marcher")?;
    if options.demo {
        let objects = engine.load_demo();
        info!(objects, "demo scene loaded");
    }

    let shader_updates = options.shader_updates;
    let clock = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { ref event, window_id } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => engine.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Some(updates) = &shader_updates {
                    reload_changed_shaders(&mut engine, updates);
                }
                match engine.render(clock.elapsed().as_secs_f64() * 1000.0) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => engine.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory, exiting");
                        elwt.exit();
                    }
                    Err(e) => warn!("frame skipped: {e:?}"),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                engine.pointer_move(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(*button) {
                    match state {
                        ElementState::Pressed => engine.pointer_down(button),
                        ElementState::Released => engine.pointer_up(button),
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_NOTCH,
                };
                engine.wheel(notches);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => handle_key(&mut engine, *code),
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;
    Ok(())
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn handle_key(engine: &mut Engine, code: KeyCode) {
    let spawn = match code {
        KeyCode::Digit1 => Some(0),
        KeyCode::Digit2 => Some(1),
        KeyCode::Digit3 => Some(2),
        KeyCode::Digit4 => Some(3),
        KeyCode::Digit5 => Some(4),
        KeyCode::Digit6 => Some(5),
        _ => None,
    };
    if let Some(primitive) = spawn.and_then(|i| Primitive::ALL.get(i).copied()) {
        let id = engine.spawn(primitive);
        info!(%id, %primitive, "spawned");
        return;
    }
    match code {
        KeyCode::Delete | KeyCode::Backspace => {
            engine.remove_selected();
        }
        KeyCode::Escape => engine.deselect(),
        KeyCode::KeyF => engine.recenter(),
        _ => {}
    }
}

/// Apply the newest version of each changed shader. Older notifications for
/// the same burst of writes are skipped.
fn reload_changed_shaders(engine: &mut Engine, updates: &Receiver<PathBuf>) {
    let Some(path) = updates.try_iter().last() else {
        return;
    };
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            warn!(path = %path.display(), "failed to read shader: {e}");
            return;
        }
    };
    match engine.reload_shader(&source) {
        Ok(()) => info!(path = %path.display(), "shader reloaded"),
        Err(e) => warn!(path = %path.display(), "shader rejected, keeping previous pipeline:\n{e}"),
    }
}
