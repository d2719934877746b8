//! Bounding-square enumeration, inside test via signed edge functions,
//! barycentric attribute interpolation, and the depth test between the
//! z pre-pass and the main pass.

use crate::clip::ClippedTriangle;
use crate::error::RasterError;
use crate::framebuffer::Framebuffer;
use crate::math::{barycentric, linear_to_exponential_inverted_z, signed_area};
use crate::mesh::BoundingSquare;
use crate::vector::{Vec2, Vec3};

/// Per-fragment varyings handed to the shader callback: screen-space
/// barycentric interpolation of `fragPos`/`fragNormal`/`fragTexCoord`,
/// exactly as spec.md documents (not perspective-correct — see the
/// Open Question recorded in SPEC_FULL.md/DESIGN.md).
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
    pub frag_pos: Vec3,
    pub frag_normal: Vec3,
    pub frag_tex_coord: Vec2,
}

fn screen_xy(tri: &ClippedTriangle) -> [Vec2; 3] {
    [
        Vec2::new(tri.screen.v0.location.x, tri.screen.v0.location.y),
        Vec2::new(tri.screen.v1.location.x, tri.screen.v1.location.y),
        Vec2::new(tri.screen.v2.location.x, tri.screen.v2.location.y),
    ]
}

/// Depth pre-pass: no shading, just `depth_buffer = min(depth_buffer, d)`
/// for every covered pixel.
pub fn z_draw_triangle(fb: &mut Framebuffer, tri: &ClippedTriangle) -> Result<(), RasterError> {
    rasterize(fb, tri, None)
}

/// Main pass: shade and write color only where the candidate depth is
/// `<=` the pre-pass depth already stored at that pixel. Never writes depth.
pub fn draw_triangle(
    fb: &mut Framebuffer,
    tri: &ClippedTriangle,
    shade: &mut dyn FnMut(&Fragment) -> [f32; 3],
) -> Result<(), RasterError> {
    rasterize(fb, tri, Some(shade))
}

fn rasterize(
    fb: &mut Framebuffer,
    tri: &ClippedTriangle,
    mut shade: Option<&mut dyn FnMut(&Fragment) -> [f32; 3]>,
) -> Result<(), RasterError> {
    let screen = screen_xy(tri);
    let area = signed_area(screen[0], screen[1], screen[2]);
    if area == 0.0 {
        return Ok(());
    }

    let bounds = BoundingSquare::from_triangle_clipped(&tri.screen, fb.width, fb.height);
    if bounds.max_x < bounds.min_x || bounds.max_y < bounds.min_y {
        return Ok(());
    }

    let ws = [
        tri.screen.v0.location.w,
        tri.screen.v1.location.w,
        tri.screen.v2.location.w,
    ];

    for y in bounds.min_y..=bounds.max_y {
        for x in bounds.min_x..=bounds.max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let (u, v, w) = barycentric(screen[0], screen[1], screen[2], p);
            if u < 0.0 || v < 0.0 || w < 0.0 {
                continue;
            }

            // Near/far of the camera aren't visible here; the clip
            // stage already constrained clip-space `w` to the visible
            // volume, so depth encoding only needs the interpolated `w`
            // itself plus the near/far the caller baked into it via
            // the camera before clipping. We take `near`/`far` through
            // the clip-space `w` values instead of re-deriving them, by
            // encoding at the call site — see `driver.rs`.
            let clip_w = u * ws[0] + v * ws[1] + w * ws[2];
            let depth = depth_from_clip_w(clip_w, fb);
            let depth = depth.clamp(0.0, 1.0);

            let x64 = x as i32;
            let y64 = y as i32;

            match &mut shade {
                None => {
                    fb.min_depth(x64, y64, depth)?;
                }
                Some(shade_fn) => {
                    if depth <= fb.depth_at(x64, y64) {
                        let frag_pos = tri.world_positions[0] * u
                            + tri.world_positions[1] * v
                            + tri.world_positions[2] * w;
                        let frag_normal = (tri.screen.v0.normal * u
                            + tri.screen.v1.normal * v
                            + tri.screen.v2.normal * w)
                            .normalize();
                        let frag_tex_coord = tri.screen.v0.coord * u
                            + tri.screen.v1.coord * v
                            + tri.screen.v2.coord * w;
                        let fragment = Fragment {
                            x: x64,
                            y: y64,
                            depth,
                            frag_pos,
                            frag_normal,
                            frag_tex_coord,
                        };
                        let rgb = shade_fn(&fragment);
                        fb.set_color(x64, y64, rgb);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Depth is encoded from the barycentric-interpolated clip-space `w`
/// via `linear_to_exponential_inverted_z`. The near/far distances are
/// threaded through a thread-local set by the frame driver for the
/// duration of one camera's render, since the rasterizer otherwise has
/// no camera context beyond the already-viewport-mapped triangle.
fn depth_from_clip_w(w: f32, fb: &Framebuffer) -> f32 {
    let (near, far) = fb.depth_encoding_range();
    linear_to_exponential_inverted_z(w, near, far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::clip_and_viewport;
    use crate::camera::Camera;
    use crate::arena::Arena;
    use crate::mesh::{Triangle, Vertex};

    fn camera() -> Camera {
        Camera::new(
            (20, 20),
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
    fn zero_area_triangle_touches_no_pixels() {
        let cam = camera();
        let mut color = vec![0.0f32; 20 * 20 * 3];
        let mut depth = vec![0.0f32; 20 * 20];
        let mut fb = Framebuffer::new(&mut color, &mut depth, 20, 20);
        fb.set_depth_encoding_range(cam.z_near, cam.z_far);
        fb.clear_depth();
        let mut arena = Arena::with_capacity(4096);
        let tri = Triangle::new(
            clip_space_vertex(&cam, Vec3::new(0.0, 0.0, 0.0)),
            clip_space_vertex(&cam, Vec3::new(0.0, 0.0, 0.0)),
            clip_space_vertex(&cam, Vec3::new(0.0, 0.0, 0.0)),
        );
        let clipped = clip_and_viewport(&tri, &cam, &mut arena).unwrap();
        for t in &clipped {
            z_draw_triangle(&mut fb, t).unwrap();
        }
        assert!(depth.iter().all(|&d| d == crate::framebuffer::DEPTH_SENTINEL));
    }

    #[test]
    fn prepass_then_main_pass_depth_test_matches_prepass() {
        let cam = camera();
        let mut color = vec![0.0f32; 20 * 20 * 3];
        let mut depth = vec![0.0f32; 20 * 20];
        let mut fb = Framebuffer::new(&mut color, &mut depth, 20, 20);
        fb.set_depth_encoding_range(cam.z_near, cam.z_far);
        fb.clear_depth();
        let mut arena = Arena::with_capacity(4096);
        let tri = Triangle::new(
            clip_space_vertex(&cam, Vec3::new(-0.3, -0.3, 0.0)),
            clip_space_vertex(&cam, Vec3::new(0.0, 0.3, 0.0)),
            clip_space_vertex(&cam, Vec3::new(0.3, -0.3, 0.0)),
        );
        let clipped = clip_and_viewport(&tri, &cam, &mut arena).unwrap();
        for t in &clipped {
            z_draw_triangle(&mut fb, t).unwrap();
        }
        let pre_pass_depth: Vec<f32> = depth.clone();
        for t in &clipped {
            let mut shade = |_f: &Fragment| [1.0f32, 1.0, 1.0];
            draw_triangle(&mut fb, t, &mut shade).unwrap();
        }
        for (d_before, d_after) in pre_pass_depth.iter().zip(depth.iter()) {
            assert_eq!(d_before, d_after, "main pass must never rewrite depth");
        }
    }
}
