//! Material: six optional textures, each with a scalar/vec3 fallback
//! and a `has*` flag selecting which one the fragment shader fetches.

#![allow(dead_code)]

use crate::texture::Texture;
use crate::vector::Vec3;

#[derive(Clone, Debug, Default)]
pub struct MaterialChannel3 {
    pub texture: Option<Texture>,
    pub fallback: Vec3,
}

impl MaterialChannel3 {
    pub fn constant(fallback: Vec3) -> MaterialChannel3 {
        MaterialChannel3 { texture: None, fallback }
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterialChannel1 {
    pub texture: Option<Texture>,
    pub fallback: f32,
}

impl MaterialChannel1 {
    pub fn constant(fallback: f32) -> MaterialChannel1 {
        MaterialChannel1 { texture: None, fallback }
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub base_color: MaterialChannel3,
    pub normal: Option<Texture>,
    pub emission: MaterialChannel3,
    pub metallic: MaterialChannel1,
    pub roughness: MaterialChannel1,
    pub ao: MaterialChannel1,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            base_color: MaterialChannel3::constant(Vec3::splat(1.0)),
            normal: None,
            emission: MaterialChannel3::constant(Vec3::zero()),
            metallic: MaterialChannel1::constant(0.0),
            roughness: MaterialChannel1::constant(0.5),
            ao: MaterialChannel1::constant(1.0),
        }
    }
}

/// Sampled material values at one fragment, ready for the BRDF.
pub struct PbrSample {
    pub base_color: Vec3,
    pub normal: Option<Vec3>,
    pub emission: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub ao: f32,
}

impl Material {
    /// `getPBRMaterial`: fetch each channel, texture-sampled (repeat
    /// wrap) if present, else the scalar/vec3 fallback. Base color is
    /// sRGB-decoded; everything else is linear. Normal-map texels are
    /// remapped `2x-1` into `[-1,1]`.
    pub fn sample(&self, u: f32, v: f32) -> PbrSample {
        let base_color = match &self.base_color.texture {
            Some(t) => {
                let s = t.sample(u, v, true, true);
                Vec3::new(s[0], s[1], s[2])
            }
            None => self.base_color.fallback,
        };

        let normal = self.normal.as_ref().map(|t| {
            let s = t.sample(u, v, true, false);
            Vec3::new(s[0] * 2.0 - 1.0, s[1] * 2.0 - 1.0, s[2] * 2.0 - 1.0)
        });

        let emission = match &self.emission.texture {
            Some(t) => {
                let s = t.sample(u, v, true, false);
                Vec3::new(s[0], s[1], s[2])
            }
            None => self.emission.fallback,
        };

        let sample_scalar = |channel: &MaterialChannel1| -> f32 {
            match &channel.texture {
                Some(t) => t.sample(u, v, true, false)[0],
                None => channel.fallback,
            }
        };

        PbrSample {
            base_color,
            normal,
            emission,
            metallic: sample_scalar(&self.metallic),
            roughness: sample_scalar(&self.roughness),
            ao: sample_scalar(&self.ao),
        }
    }
}
