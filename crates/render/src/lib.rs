//! # GPU Scene Store and Ray Marcher
//!
//! Everything that owns GPU resources: the orbit [`Camera`], the
//! [`ObjectRegistry`] with its packed object buffer, the per-frame
//! [`FrameState`] uniforms, the pick readback and the [`RayMarcher`] that
//! ties them into one render pass.
//!
//! The registry is generic over [`ObjectBuffer`] so its compaction and
//! growth rules run the same against [`HostObjectBuffer`] in tests as
//! against [`GpuObjectBuffer`] in the editor.

pub mod camera;
pub mod context;
pub mod gpu_types;
pub mod marcher;
pub mod object_buffer;
pub mod picking;
pub mod pipeline;
pub mod registry;
pub mod target;
pub mod uniforms;

pub use camera::Camera;
pub use context::{GpuContext, RenderError};
pub use gpu_types::{CameraUniform, FrameUniforms, HitRecord, ObjectRecord, SceneCounts};
pub use marcher::{PickDispatch, RayMarcher};
pub use object_buffer::{GpuObjectBuffer, HostObjectBuffer, ObjectBuffer, RECORD_SIZE};
pub use picking::{PickReadback, ReadbackGate};
pub use pipeline::{validate_wgsl, ShaderError, SHADER_SOURCE};
pub use registry::{ObjectRegistry, Removal, DEFAULT_CAPACITY};
pub use target::{Frame, RenderTarget};
pub use uniforms::{FrameState, UniformPatch};
