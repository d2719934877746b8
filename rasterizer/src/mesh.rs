//! Vertex/Triangle geometry types and the indexed triangle-soup Mesh.

#![allow(dead_code)]

use crate::bbox::BoundingBox;
use crate::matrix::Mat4;
use crate::vector::{Vec2, Vec3, Vec4};

/// A single vertex as it flows through the pipeline. During clipping
/// `location` holds a homogeneous clip-space position (`w` not yet
/// divided); after perspective divide and viewport mapping it holds
/// screen-space `x, y` in pixels, `z` normalized to `[0,1]`, and the
/// original clip-space `w` preserved for perspective-correct interpolation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Vertex {
    pub location: Vec4,
    pub normal: Vec3,
    pub coord: Vec2,
}

impl Vertex {
    pub fn new(location: Vec4, normal: Vec3, coord: Vec2) -> Vertex {
        Vertex { location, normal, coord }
    }

    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        Vertex {
            location: self.location.lerp(&other.location, t),
            normal: self.normal.lerp(&other.normal, t),
            coord: self.coord.lerp(&other.coord, t),
        }
    }
}

/// Invariant: winding is assumed clockwise front-face in screen space.
/// `driver::render` culls by winding per `RenderConfig.backface_mode`,
/// disabled by default (see DESIGN.md's "front face convention" entry).
#[derive(Copy, Clone, Debug)]
pub struct Triangle {
    pub v0: Vertex,
    pub v1: Vertex,
    pub v2: Vertex,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Triangle {
        Triangle { v0, v1, v2 }
    }

    pub fn vertices(&self) -> [Vertex; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// Pixel-space bounding square used by the rasterizer.
#[derive(Copy, Clone, Debug)]
pub struct BoundingSquare {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingSquare {
    /// Clip the triangle's screen-space AABB to `[0, width) x [0, height)`.
    pub fn from_triangle_clipped(tri: &Triangle, width: i32, height: i32) -> BoundingSquare {
        let xs = [tri.v0.location.x, tri.v1.location.x, tri.v2.location.x];
        let ys = [tri.v0.location.y, tri.v1.location.y, tri.v2.location.y];
        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min).floor() as i64;
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min).floor() as i64;
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
        BoundingSquare {
            min_x: min_x.max(0),
            min_y: min_y.max(0),
            max_x: max_x.min(width as i64 - 1),
            max_y: max_y.min(height as i64 - 1),
        }
    }
}

/// Indexed triangle soup in world space (or object space, paired with
/// `transform`, both forms supported per the importer collaborator
/// contract). Immutable during rendering.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<Vec4>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub transform: Mat4,
    pub bounding_box: BoundingBox,
    pub material_index: u32,
    pub name: String,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Build the position-only `Triangle` for index triple `i` (used by
    /// the z pre-pass, which does not need normal/uv payload).
    pub fn position_triangle(&self, tri_index: usize) -> Triangle {
        let base = tri_index * 3;
        let mk = |k: usize| -> Vertex {
            let idx = self.indices[base + k] as usize;
            Vertex::new(self.vertices[idx], Vec3::zero(), Vec2::zero())
        };
        Triangle::new(mk(0), mk(1), mk(2))
    }

    /// Build the full `Triangle` (position + normal + uv) for index
    /// triple `i` (used by the main pass).
    pub fn full_triangle(&self, tri_index: usize) -> Triangle {
        let base = tri_index * 3;
        let mk = |k: usize| -> Vertex {
            let idx = self.indices[base + k] as usize;
            Vertex::new(self.vertices[idx], self.normals[idx], self.tex_coords[idx])
        };
        Triangle::new(mk(0), mk(1), mk(2))
    }
}
