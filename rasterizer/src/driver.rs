//! Frame driver: the one entry point that walks a `Scene` through the
//! z pre-pass then the main pass, camera by camera, into a caller-owned
//! `Framebuffer`.

use crate::arena::Arena;
use crate::bbox::FrustumTest;
use crate::camera::Camera;
use crate::clip::{clip_and_viewport, ClippedTriangle};
use crate::config::{BackfaceMode, RenderConfig};
use crate::error::RasterError;
use crate::framebuffer::Framebuffer;
use crate::math::signed_area;
use crate::mesh::{Mesh, Triangle};
use crate::raster::{draw_triangle, z_draw_triangle};
use crate::scene::Scene;
use crate::shader::{shade_fragment, ShadingContext};
use crate::vector::{Vec2, Vec4};

fn transform_triangle(tri: &Triangle, mvp: &crate::matrix::Mat4) -> Triangle {
    let xf = |v: &crate::mesh::Vertex| -> crate::mesh::Vertex {
        crate::mesh::Vertex::new(*mvp * v.location, v.normal, v.coord)
    };
    Triangle::new(xf(&tri.v0), xf(&tri.v1), xf(&tri.v2))
}

fn transform_normal(n: crate::vector::Vec3, normal_matrix: &[[f32; 3]; 3]) -> crate::vector::Vec3 {
    crate::vector::Vec3::new(
        normal_matrix[0][0] * n.x + normal_matrix[0][1] * n.y + normal_matrix[0][2] * n.z,
        normal_matrix[1][0] * n.x + normal_matrix[1][1] * n.y + normal_matrix[1][2] * n.z,
        normal_matrix[2][0] * n.x + normal_matrix[2][1] * n.y + normal_matrix[2][2] * n.z,
    )
}

fn world_space_bounds(mesh: &Mesh) -> crate::bbox::BoundingBox {
    let corners: Vec<crate::vector::Vec3> = (0..8u32)
        .map(|i| (mesh.transform * mesh.bounding_box.corner(i).to_vec4(1.0)).xyz())
        .collect();
    crate::bbox::BoundingBox::from_points(&corners)
}

/// Screen-space winding test, per `renderer.rs`'s `BackfaceMode`: the
/// sign of the triangle's signed area names its vertex order.
fn is_culled(tri: &ClippedTriangle, mode: BackfaceMode) -> bool {
    let v = tri.screen.vertices();
    let area = signed_area(
        Vec2::new(v[0].location.x, v[0].location.y),
        Vec2::new(v[1].location.x, v[1].location.y),
        Vec2::new(v[2].location.x, v[2].location.y),
    );
    match mode {
        BackfaceMode::Ccw => area > 0.0,
        BackfaceMode::Cw => area < 0.0,
        BackfaceMode::Disable => false,
    }
}

/// Depth-only pass: clears to `DEPTH_SENTINEL`, then writes the nearest
/// depth at every covered pixel for every visible mesh. Frustum-culls
/// whole meshes whose world-space AABB is fully `Outside` the camera.
fn z_pre_pass(
    fb: &mut Framebuffer,
    arena: &mut Arena,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<(), RasterError> {
    let planes = crate::plane::extract_frustum_planes(&camera.view_projection_matrix);

    let mut meshes_culled = 0usize;
    let mut triangles_clipped_away = 0usize;

    for mesh in &scene.meshes {
        if world_space_bounds(mesh).classify_frustum(&planes) == FrustumTest::Outside {
            meshes_culled += 1;
            continue;
        }
        let mvp = camera.view_projection_matrix * mesh.transform;
        for tri_index in 0..mesh.triangle_count() {
            let object_tri = mesh.position_triangle(tri_index);
            let clip_tri = transform_triangle(&object_tri, &mvp);
            let clipped = clip_and_viewport(&clip_tri, camera, arena)?;
            if clipped.is_empty() {
                triangles_clipped_away += 1;
            }
            for t in &clipped {
                if is_culled(t, config.backface_mode) {
                    continue;
                }
                z_draw_triangle(fb, t)?;
            }
        }
    }

    log::debug!(
        "z pre-pass: {} of {} meshes frustum-culled, {} triangles clipped away",
        meshes_culled,
        scene.meshes.len(),
        triangles_clipped_away
    );
    Ok(())
}

/// Shaded pass: re-walks the same visible meshes, this time with full
/// vertex payload and the PBR fragment shader, gated by the depth
/// pre-pass already written to `fb`. Never rewrites the depth plane.
fn main_pass(
    fb: &mut Framebuffer,
    arena: &mut Arena,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<(), RasterError> {
    let planes = crate::plane::extract_frustum_planes(&camera.view_projection_matrix);
    let view_pos = Camera::world_position_from_inverse_view(&camera.inverse_view_matrix);
    let ctx = ShadingContext {
        lights: &scene.lights,
        view_pos,
    };

    let mut meshes_culled = 0usize;
    let mut triangles_clipped_away = 0usize;
    let mut triangles_backface_culled = 0usize;

    for mesh in &scene.meshes {
        if world_space_bounds(mesh).classify_frustum(&planes) == FrustumTest::Outside {
            meshes_culled += 1;
            continue;
        }
        let material = scene.material_for(mesh);
        let mvp = camera.view_projection_matrix * mesh.transform;
        let normal_matrix = mesh.transform.mat3_transpose_inverse();

        for tri_index in 0..mesh.triangle_count() {
            let mut object_tri = mesh.full_triangle(tri_index);
            object_tri.v0.normal = transform_normal(object_tri.v0.normal, &normal_matrix);
            object_tri.v1.normal = transform_normal(object_tri.v1.normal, &normal_matrix);
            object_tri.v2.normal = transform_normal(object_tri.v2.normal, &normal_matrix);

            let clip_tri = transform_triangle(&object_tri, &mvp);
            let clipped = clip_and_viewport(&clip_tri, camera, arena)?;
            if clipped.is_empty() {
                triangles_clipped_away += 1;
            }
            for t in &clipped {
                if is_culled(t, config.backface_mode) {
                    triangles_backface_culled += 1;
                    continue;
                }
                let mut shade = |f: &crate::raster::Fragment| -> [f32; 3] {
                    shade_fragment(&material, f.frag_pos, f.frag_normal, f.frag_tex_coord, &ctx)
                };
                draw_triangle(fb, t, &mut shade)?;
            }
        }
    }

    log::debug!(
        "main pass: {} of {} meshes frustum-culled, {} triangles clipped away, {} backface-culled",
        meshes_culled,
        scene.meshes.len(),
        triangles_clipped_away,
        triangles_backface_culled
    );
    Ok(())
}

/// Render every camera in `scene` into `fb`, z pre-pass then main pass,
/// each camera's depth plane cleared first but the color plane left
/// untouched between cameras (later cameras' main passes blend onto
/// whatever earlier cameras already drew, per the multi-camera
/// compositing contract this crate adds over the single-camera source).
pub fn render(
    fb: &mut Framebuffer,
    arena: &mut Arena,
    scene: &Scene,
    config: &RenderConfig,
) -> Result<(), RasterError> {
    for (index, camera) in scene.cameras.iter().enumerate() {
        log::trace!(
            "camera {}/{}: {}x{} arena {} bytes",
            index + 1,
            scene.cameras.len(),
            camera.resolution.0,
            camera.resolution.1,
            arena.capacity()
        );

        fb.set_depth_encoding_range(camera.z_near, camera.z_far);
        fb.clear_depth();

        arena.pop_all();
        arena.memset_zero();
        z_pre_pass(fb, arena, scene, camera, config)?;

        arena.pop_all();
        main_pass(fb, arena, scene, camera, config)?;

        arena.pop_all();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;
    use crate::light::{Attenuation, Light, LightColor};
    use crate::matrix::Mat4;
    use crate::vector::{Vec2, Vec3};

    fn quad_mesh() -> Mesh {
        let vertices = vec![
            Vec4::new(-0.5, -0.5, 0.0, 1.0),
            Vec4::new(0.5, -0.5, 0.0, 1.0),
            Vec4::new(0.5, 0.5, 0.0, 1.0),
            Vec4::new(-0.5, 0.5, 0.0, 1.0),
        ];
        let normals = vec![Vec3::new(0.0, 0.0, 1.0); 4];
        let tex_coords = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        let bounding_box = BoundingBox::from_points(&vertices.iter().map(|v| v.xyz()).collect::<Vec<_>>());
        Mesh {
            vertices,
            normals,
            tex_coords,
            indices,
            transform: Mat4::identity(),
            bounding_box,
            material_index: 0,
            name: "quad".to_string(),
        }
    }

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        scene.meshes.push(quad_mesh());
        scene.cameras.push(Camera::new(
            (20, 20),
            90.0,
            0.01,
            10.0,
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::zero(),
            Vec3::new(0.0, 1.0, 0.0),
        ));
        scene.lights.push(Light::Point {
            location: Vec3::new(0.0, 2.0, 2.0),
            attenuation: Attenuation::default(),
            color: LightColor {
                ambient: Vec3::splat(0.02),
                diffuse: Vec3::splat(50.0),
                specular: Vec3::splat(50.0),
                intensity: 0.05,
            },
        });
        scene
    }

    #[test]
    fn render_paints_the_quad_and_leaves_corners_untouched() {
        let scene = test_scene();
        let config = RenderConfig::default();
        let mut color = vec![0.0f32; 20 * 20 * 3];
        let mut depth = vec![0.0f32; 20 * 20];
        let mut fb = Framebuffer::new(&mut color, &mut depth, 20, 20);
        let mut arena = Arena::with_capacity(64 * 1024);

        render(&mut fb, &mut arena, &scene, &config).unwrap();

        let center_idx = (10 * 20 + 10) * 3;
        let corner_idx = (0 * 20 + 0) * 3;
        let center_lit: f32 = color[center_idx..center_idx + 3].iter().sum();
        let corner_lit: f32 = color[corner_idx..corner_idx + 3].iter().sum();
        assert!(center_lit > 0.0);
        assert_eq!(corner_lit, 0.0);
    }

    #[test]
    fn render_leaves_arena_fully_popped() {
        let scene = test_scene();
        let config = RenderConfig::default();
        let mut color = vec![0.0f32; 20 * 20 * 3];
        let mut depth = vec![0.0f32; 20 * 20];
        let mut fb = Framebuffer::new(&mut color, &mut depth, 20, 20);
        let mut arena = Arena::with_capacity(64 * 1024);

        render(&mut fb, &mut arena, &scene, &config).unwrap();
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn empty_scene_renders_without_error_and_leaves_color_untouched() {
        let scene = Scene::new();
        let config = RenderConfig::default();
        let mut color = vec![0.25f32; 10 * 10 * 3];
        let mut depth = vec![0.0f32; 10 * 10];
        let mut fb = Framebuffer::new(&mut color, &mut depth, 10, 10);
        let mut arena = Arena::with_capacity(4096);
        render(&mut fb, &mut arena, &scene, &config).unwrap();
        assert!(color.iter().all(|&c| c == 0.25));
    }

    fn center_lit_with_mode(mode: BackfaceMode) -> f32 {
        let scene = test_scene();
        let mut config = RenderConfig::default();
        config.backface_mode = mode;
        let mut color = vec![0.0f32; 20 * 20 * 3];
        let mut depth = vec![0.0f32; 20 * 20];
        let mut fb = Framebuffer::new(&mut color, &mut depth, 20, 20);
        let mut arena = Arena::with_capacity(64 * 1024);
        render(&mut fb, &mut arena, &scene, &config).unwrap();
        let center_idx = (10 * 20 + 10) * 3;
        color[center_idx..center_idx + 3].iter().sum()
    }

    #[test]
    fn one_winding_mode_culls_the_quad_and_the_other_leaves_it_lit() {
        let disabled = center_lit_with_mode(BackfaceMode::Disable);
        let ccw = center_lit_with_mode(BackfaceMode::Ccw);
        let cw = center_lit_with_mode(BackfaceMode::Cw);

        assert!(disabled > 0.0);
        // The quad has a single, fixed screen-space winding: exactly one
        // of the two culling modes discards it, the other leaves it lit.
        assert!((ccw == 0.0) != (cw == 0.0));
        assert!(ccw == 0.0 || ccw == disabled);
        assert!(cw == 0.0 || cw == disabled);
    }
}
