//! # SDF Editor
//!
//! Interactive layer on top of the render crate: the [`Engine`] turns pointer
//! input and pick results into camera navigation, selection and gizmo drags,
//! and [`run`] wires it into a winit window.
//!
//! An inspector plugs in through [`EditorListener`] to hear about viewport
//! selection changes, and pushes edits back with [`Engine::apply_field_edit`].

pub mod config;
pub mod demo;
pub mod engine;
pub mod field;
pub mod input;
pub mod run;
pub mod selection;

pub use config::{ConfigError, EditorConfig};
pub use engine::{EditorListener, Engine, EngineError, LogListener};
pub use field::FieldEdit;
pub use input::{Gesture, InputState, PointerButton, PressTracker};
pub use run::{run, RunOptions};
pub use selection::{PickTarget, Selection};
