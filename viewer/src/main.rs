//! Demo application: builds a small hardcoded scene, runs it through
//! `rasterizer::render`, and writes the color plane out as a PNG.

use anyhow::{Context, Result};
use rasterizer::camera::Camera;
use rasterizer::light::{Attenuation, Light, LightColor};
use rasterizer::material::{Material, MaterialChannel1, MaterialChannel3};
use rasterizer::mesh::Mesh;
use rasterizer::vector::{Vec2, Vec3};
use rasterizer::{Arena, Framebuffer, RenderConfig, Scene};

fn cube_mesh() -> Mesh {
    // Eight corners of a unit cube centered on the origin, 12 triangles,
    // per-face flat normals (no shared-vertex smoothing).
    let half = 0.5;
    let raw = [
        Vec3::new(-half, -half, -half),
        Vec3::new(half, -half, -half),
        Vec3::new(half, half, -half),
        Vec3::new(-half, half, -half),
        Vec3::new(-half, -half, half),
        Vec3::new(half, -half, half),
        Vec3::new(half, half, half),
        Vec3::new(-half, half, half),
    ];

    let faces: [[usize; 4]; 6] = [
        [0, 1, 2, 3], // back
        [5, 4, 7, 6], // front
        [4, 0, 3, 7], // left
        [1, 5, 6, 2], // right
        [3, 2, 6, 7], // top
        [4, 5, 1, 0], // bottom
    ];
    let face_normals = [
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
    ];
    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut tex_coords = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, normal) in faces.iter().zip(face_normals.iter()) {
        let base = vertices.len() as u32;
        for (k, &corner) in face.iter().enumerate() {
            vertices.push(raw[corner].to_vec4(1.0));
            normals.push(*normal);
            tex_coords.push(uvs[k]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let bounding_box = rasterizer::bbox::BoundingBox::from_points(&raw);

    Mesh {
        vertices,
        normals,
        tex_coords,
        indices,
        transform: rasterizer::matrix::Mat4::identity(),
        bounding_box,
        material_index: 0,
        name: "cube".to_string(),
    }
}

fn demo_scene(config: &RenderConfig) -> Scene {
    let mut scene = Scene::new();
    scene.meshes.push(cube_mesh());

    scene.materials.insert(
        0,
        Material {
            base_color: MaterialChannel3::constant(Vec3::new(0.7, 0.15, 0.15)),
            normal: None,
            emission: MaterialChannel3::constant(Vec3::zero()),
            metallic: MaterialChannel1::constant(0.1),
            roughness: MaterialChannel1::constant(0.4),
            ao: MaterialChannel1::constant(1.0),
        },
    );

    scene.cameras.push(Camera::new(
        config.default_resolution,
        60.0,
        config.default_z_near,
        config.default_z_far,
        Vec3::new(1.5, 1.2, 3.0),
        Vec3::zero(),
        Vec3::new(0.0, 1.0, 0.0),
    ));

    scene.lights.push(Light::Point {
        location: Vec3::new(2.0, 3.0, 2.0),
        attenuation: Attenuation::default(),
        color: LightColor {
            ambient: Vec3::splat(0.03),
            diffuse: Vec3::splat(60.0),
            specular: Vec3::splat(60.0),
            intensity: 0.08,
        },
    });
    scene.lights.push(Light::Directional {
        direction: Vec3::new(-0.3, -1.0, -0.2).normalize(),
        color: LightColor {
            ambient: Vec3::zero(),
            diffuse: Vec3::splat(1.5),
            specular: Vec3::splat(1.0),
            intensity: 1.0,
        },
    });

    scene
}

fn main() -> Result<()> {
    env_logger::init();

    let config = RenderConfig::default();
    log::info!(
        "rendering {}x{} with a {}-byte scratch arena",
        config.default_resolution.0,
        config.default_resolution.1,
        config.arena_bytes
    );

    let (width, height) = config.default_resolution;
    let scene = demo_scene(&config);

    let mut color = vec![0.0f32; (width * height * 3) as usize];
    let mut depth = vec![0.0f32; (width * height) as usize];
    let mut fb = Framebuffer::new(&mut color, &mut depth, width as i32, height as i32);
    let mut arena = Arena::with_capacity(config.arena_bytes);

    rasterizer::render(&mut fb, &mut arena, &scene, &config).context("rendering demo scene failed")?;

    let mut pixels = vec![0u8; (width * height * 3) as usize];
    for (dst, &src) in pixels.iter_mut().zip(color.iter()) {
        *dst = (src.clamp(0.0, 1.0) * 255.0).round() as u8;
    }

    let out_path = "viewer_output.png";
    image::save_buffer(out_path, &pixels, width, height, image::ColorType::Rgb8)
        .with_context(|| format!("writing {out_path}"))?;
    log::info!("wrote {out_path}");

    Ok(())
}
