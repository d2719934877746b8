//! CPU-only triangle rasterization: vertex transform, homogeneous
//! clip-space polygon clipping, perspective divide and viewport
//! mapping, edge-function rasterization with a depth pre-pass, and a
//! Cook-Torrance PBR fragment shader. No GPU, no threads on the hot
//! path — see `arena` for the one allocation discipline that differs
//! from the rest of the crate.

pub mod arena;
pub mod bbox;
pub mod camera;
pub mod clip;
pub mod config;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod light;
pub mod material;
pub mod math;
pub mod matrix;
pub mod mesh;
pub mod plane;
pub mod raster;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod vector;

pub use arena::Arena;
pub use camera::Camera;
pub use config::{BackfaceMode, RenderConfig};
pub use driver::render;
pub use error::RasterError;
pub use framebuffer::Framebuffer;
pub use light::Light;
pub use material::Material;
pub use mesh::Mesh;
pub use scene::Scene;
