#![allow(clippy::module_name_repetitions)]
//! # Scene Model and SDF Library
//!
//! CPU-side building blocks of the SDF editor. Nothing in this crate touches
//! the GPU; the render crate mirrors these types into buffers and the WGSL
//! shader mirrors these functions.
//!
//! ## Key Components
//!
//! -   **Primitives and objects:** [`Primitive`] is the closed set of shapes
//!     the ray marcher understands and [`SceneObject`] is a plain value struct
//!     describing one placed shape. Objects know nothing about where they live
//!     in GPU memory.
//! -   **Identifiers:** [`IdGenerator`] hands out [`ObjectId`]s. The editor
//!     injects one so tests can use deterministic ids.
//! -   **Distance functions:** the [`sdf`] module evaluates primitives, the
//!     ground grid and the whole scene. The [`gizmo`] module adds the
//!     translation handles drawn around the selected object.
//! -   **Reference marcher:** [`march`] runs the same marching and picking
//!     loops as the shader on the CPU, and [`shading`] holds the color math.
//!
//! ```rust
//! use scene::{Primitive, SceneObject, ObjectId, sdf};
//! use glam::Vec3;
//!
//! let ball = SceneObject::new(ObjectId(1), "ball", Primitive::Sphere);
//! let d = sdf::object_distance(Vec3::new(0.0, 0.0, 2.0), &ball);
//! assert!((d - 1.5).abs() < 1e-5);
//! ```

pub mod gizmo;
pub mod id;
pub mod march;
pub mod object;
pub mod sdf;
pub mod settings;
pub mod shading;
pub mod types;

pub use gizmo::{GizmoAxis, GizmoPart};
pub use id::{IdGenerator, SaltedCounter, SequentialIds};
pub use march::{HitKind, HitResult, MarchHit, Ray};
pub use object::SceneObject;
pub use sdf::{Material, SceneSample};
pub use settings::MarchSettings;
pub use types::{ObjectId, ParsePrimitiveError, Primitive};
