//! WebGPU rendering module
//!
//! The scene is built on the CPU as one colored triangle list per frame and
//! drawn with a single flat-shaded pipeline.

pub mod backdrop;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use backdrop::Backdrop;
pub use pipeline::RenderState;
pub use scene::{RenderContext, build_scene};
pub use vertex::Vertex;
