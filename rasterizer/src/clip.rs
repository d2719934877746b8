//! Sutherland-Hodgman clipping against the six homogeneous-clip-space
//! planes, fan-triangulation, perspective divide and viewport mapping.
//!
//! One clipper serves both the z pre-pass and the main pass: the
//! pre-pass simply builds its input `Triangle` with a zero `normal`/
//! `coord` payload (see `Mesh::position_triangle`), so this single code
//! path covers both instead of the source's duplicated pre-pass/main-pass
//! clippers (see DESIGN.md's resolution of that design note).

use crate::arena::Arena;
use crate::camera::Camera;
use crate::error::RasterError;
use crate::mesh::{Triangle, Vertex};
use crate::vector::{Vec2, Vec3, Vec4};

/// The pipeline is specified with `isZForwardPositive = 1`: near is
/// `z = 0`, far is `z = w` in clip space.
const IS_Z_FORWARD_POSITIVE: bool = true;

/// Signed "inside" value for each of the six half-spaces, in
/// `x>=-w, x<=w, y>=-w, y<=w, z>=0, z<=w` order. Non-negative means inside.
fn plane_test(plane: usize, v: &Vertex) -> f32 {
    let p = v.location;
    match plane {
        0 => p.w + p.x,
        1 => p.w - p.x,
        2 => p.w + p.y,
        3 => p.w - p.y,
        4 => {
            if IS_Z_FORWARD_POSITIVE {
                p.z
            } else {
                p.w + p.z
            }
        }
        5 => p.w - p.z,
        _ => unreachable!("only six clip planes"),
    }
}

fn lerp_vertex(a: &Vertex, b: &Vertex, t: f32) -> Vertex {
    Vertex {
        location: a.location.lerp(&b.location, t),
        normal: a.normal.lerp(&b.normal, t),
        coord: a.coord.lerp(&b.coord, t),
    }
}

/// Clip one polygon (given as a slice with a live length `<= 9`) against
/// a single plane, writing the surviving/new vertices into `out` (whose
/// live length is reset to 0 on entry). Returns the new live length.
fn clip_against_plane(plane: usize, input: &[Vertex], out: &mut [Vertex]) -> usize {
    let n = input.len();
    if n == 0 {
        return 0;
    }
    let mut count = 0;
    for i in 0..n {
        let cur = input[i];
        let prev = input[(i + n - 1) % n];
        let f_cur = plane_test(plane, &cur);
        let f_prev = plane_test(plane, &prev);
        let cur_inside = f_cur >= 0.0;
        let prev_inside = f_prev >= 0.0;

        if cur_inside != prev_inside {
            let t = f_prev / (f_prev - f_cur);
            out[count] = lerp_vertex(&prev, &cur, t);
            count += 1;
        }
        if cur_inside {
            out[count] = cur;
            count += 1;
        }
    }
    count
}

/// One clipped-and-viewport-mapped output triangle, plus the
/// reconstructed world-space position of each of its three vertices
/// (used by the fragment shader for lighting and the view vector).
pub struct ClippedTriangle {
    pub screen: Triangle,
    pub world_positions: [Vec3; 3],
}

/// Perspective divide (`x,y,z /= w`, `w` preserved) and NDC -> viewport
/// mapping. `z_screen` is carried for completeness only: the
/// rasterizer's actual depth test recomputes depth separately from the
/// interpolated clip-space `w` (see `math::linear_to_exponential_inverted_z`).
fn perspective_divide_and_viewport(v: &Vertex, width: f32, height: f32, near: f32, far: f32) -> Vertex {
    let w = v.location.w;
    let ndc = Vec3::new(v.location.x / w, v.location.y / w, v.location.z / w);
    let x_screen = (ndc.x + 1.0) * 0.5 * width;
    let y_screen = (1.0 - ndc.y) * 0.5 * height;
    let z_screen = (ndc.z + 1.0) * 0.5 * (far - near) + near;
    Vertex {
        location: Vec4::new(x_screen, y_screen, z_screen, w),
        normal: v.normal,
        coord: v.coord,
    }
}

fn world_position(clip_point: &Vec4, world_from_clip: &crate::matrix::Mat4) -> Vec3 {
    (*world_from_clip * *clip_point).xyz()
}

/// Clip `triangle` (clip-space positions, `w` not yet divided) against
/// the view frustum, fan-triangulate the survivor, and map to viewport
/// space. Returns zero triangles if the input is entirely clipped away.
pub fn clip_and_viewport(
    triangle: &Triangle,
    camera: &Camera,
    arena: &mut Arena,
) -> Result<Vec<ClippedTriangle>, RasterError> {
    let world_from_clip = camera.inverse_view_matrix * camera.inverse_projection_matrix;

    let mut buf_a = arena.push_typed::<Vertex>(9)?;
    let mut buf_b = arena.push_typed::<Vertex>(9)?;

    let verts = triangle.vertices();
    buf_a[0] = verts[0];
    buf_a[1] = verts[1];
    buf_a[2] = verts[2];
    let mut len = 3usize;

    let mut use_a_as_input = true;
    for plane in 0..6 {
        let (input, output) = if use_a_as_input {
            (&buf_a[..len], &mut buf_b[..])
        } else {
            (&buf_b[..len], &mut buf_a[..])
        };
        len = clip_against_plane(plane, input, output);
        use_a_as_input = !use_a_as_input;
        if len < 3 {
            arena.pop_typed::<Vertex>(9)?;
            arena.pop_typed::<Vertex>(9)?;
            return Ok(Vec::new());
        }
    }

    let survivors: Vec<Vertex> = if use_a_as_input {
        buf_a[..len].to_vec()
    } else {
        buf_b[..len].to_vec()
    };

    arena.pop_typed::<Vertex>(9)?;
    arena.pop_typed::<Vertex>(9)?;

    let width = camera.resolution.0 as f32;
    let height = camera.resolution.1 as f32;

    let mut out = Vec::with_capacity(survivors.len().saturating_sub(2));
    for i in 1..survivors.len() - 1 {
        let clip_tri = [survivors[0], survivors[i], survivors[i + 1]];
        let world_positions = [
            world_position(&clip_tri[0].location, &world_from_clip),
            world_position(&clip_tri[1].location, &world_from_clip),
            world_position(&clip_tri[2].location, &world_from_clip),
        ];
        let screen = Triangle::new(
            perspective_divide_and_viewport(&clip_tri[0], width, height, camera.z_near, camera.z_far),
            perspective_divide_and_viewport(&clip_tri[1], width, height, camera.z_near, camera.z_far),
            perspective_divide_and_viewport(&clip_tri[2], width, height, camera.z_near, camera.z_far),
        );
        out.push(ClippedTriangle { screen, world_positions });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec2;

    fn camera() -> Camera {
        Camera::new(
            (120, 120),
            90.0,
            0.01,
            10.0,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::zero(),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    fn clip_space_vertex(cam: &Camera, world: Vec3) -> Vertex {
        let clip = cam.view_projection_matrix * world.to_vec4(1.0);
        Vertex::new(clip, Vec3::new(0.0, 0.0, -1.0), Vec2::zero())
    }

    #[test]
    fn fully_interior_triangle_survives_as_one() {
        let cam = camera();
        let mut arena = Arena::with_capacity(4096);
        let tri = Triangle::new(
            clip_space_vertex(&cam, Vec3::new(-0.1, -0.1, 0.0)),
            clip_space_vertex(&cam, Vec3::new(0.0, 0.1, 0.0)),
            clip_space_vertex(&cam, Vec3::new(0.1, -0.1, 0.0)),
        );
        let out = clip_and_viewport(&tri, &cam, &mut arena).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn triangle_behind_camera_is_fully_clipped() {
        let cam = camera();
        let mut arena = Arena::with_capacity(4096);
        let tri = Triangle::new(
            clip_space_vertex(&cam, Vec3::new(-0.1, -0.1, 6.0)),
            clip_space_vertex(&cam, Vec3::new(0.0, 0.1, 6.0)),
            clip_space_vertex(&cam, Vec3::new(0.1, -0.1, 6.0)),
        );
        let out = clip_and_viewport(&tri, &cam, &mut arena).unwrap();
        assert!(out.is_empty());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn triangle_straddling_near_plane_yields_two_triangles() {
        let cam = camera();
        let mut arena = Arena::with_capacity(4096);
        // One vertex in front of the camera (inside near..far), two behind it.
        let tri = Triangle::new(
            clip_space_vertex(&cam, Vec3::new(0.0, 0.0, 0.5)),
            clip_space_vertex(&cam, Vec3::new(-1.0, -1.0, 1.5)),
            clip_space_vertex(&cam, Vec3::new(1.0, -1.0, 1.5)),
        );
        let out = clip_and_viewport(&tri, &cam, &mut arena).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(arena.used(), 0);
    }
}
