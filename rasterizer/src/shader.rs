//! Cook-Torrance direct-lighting fragment shader: material fetch, a
//! GGX/Smith-Schlick BRDF evaluated per light, Reinhard tone-map + gamma.

#![allow(dead_code)]

use std::f32::consts::PI;

use crate::light::{Attenuation, Light};
use crate::material::Material;
use crate::math::tonemap_reinhard_gamma;
use crate::vector::{Vec2, Vec3};

/// Guards every division in the BRDF against a zero denominator,
/// matching spec.md's "divisions by zero in the BRDF are guarded with
/// `max(., eps)`" failure-semantics note.
const EPS: f32 = 0.001;

fn point_light_attenuation(distance: f32, a: &Attenuation) -> f32 {
    1.0 / (a.constant + a.linear * distance + a.quadratic * distance * distance).max(EPS)
}

/// GGX normal distribution function.
fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (PI * denom * denom).max(EPS)
}

/// Smith geometry term (direct-lighting `k` remap) for one direction.
fn geometry_schlick_ggx(n_dot_x: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = (r * r) / 8.0;
    n_dot_x / (n_dot_x * (1.0 - k) + k).max(EPS)
}

fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

/// Schlick Fresnel approximation.
fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
    let t = (1.0 - cos_theta).clamp(0.0, 1.0).powf(5.0);
    f0 + (Vec3::splat(1.0) - f0) * t
}

/// Cook-Torrance direct radiance contribution of one light whose
/// direction-to-fragment is `l` (already normalized), given the
/// fragment's normal `n`, view vector `v`, material sample, and the
/// light's already-attenuated color*intensity.
fn calculate_radiance(
    n: Vec3,
    v: Vec3,
    l: Vec3,
    albedo: Vec3,
    metallic: f32,
    roughness: f32,
    ao: f32,
    radiance: Vec3,
) -> Vec3 {
    let h = (v + l).normalize();
    let n_dot_l = n.dot(&l).max(0.0);
    let n_dot_v = n.dot(&v).max(EPS);
    let n_dot_h = n.dot(&h).max(0.0);
    let v_dot_h = v.dot(&h).max(0.0);

    let f0 = Vec3::splat(0.04).lerp(&albedo, metallic);

    let d = distribution_ggx(n_dot_h, roughness);
    let g = geometry_smith(n_dot_v, n_dot_l, roughness);
    let f = fresnel_schlick(v_dot_h, f0);

    let specular = f * (d * g / (4.0 * n_dot_v * n_dot_l).max(EPS));

    let k_s = f;
    let k_d = (Vec3::splat(1.0) - k_s) * (1.0 - metallic);

    (k_d * albedo * (1.0 / PI) + specular) * radiance * n_dot_l * ao
}

/// Flat, per-triangle data the fragment shader needs beyond the
/// interpolated varyings: every light in the scene, plus the
/// world-space eye position (column 3 of the inverse view matrix).
pub struct ShadingContext<'a> {
    pub lights: &'a [Light],
    pub view_pos: Vec3,
}

/// Evaluate the full lighting pipeline for one fragment and return the
/// tone-mapped, gamma-corrected RGB to write into the color buffer.
/// Alpha is always 1 and is not stored (the color plane is RGB only).
pub fn shade_fragment(
    material: &Material,
    frag_pos: Vec3,
    frag_normal: Vec3,
    frag_tex_coord: Vec2,
    ctx: &ShadingContext,
) -> [f32; 3] {
    let sample = material.sample(frag_tex_coord.x, frag_tex_coord.y);
    let n = sample.normal.unwrap_or(frag_normal).normalize();
    let v = (ctx.view_pos - frag_pos).normalize();

    let mut lo = Vec3::zero();

    for light in ctx.lights {
        lo += light_contribution(light, &sample, n, v, frag_pos);
    }

    lo += sample.emission;

    let tone_mapped = tonemap_reinhard_gamma([lo.x, lo.y, lo.z]);
    tone_mapped
}

fn light_contribution(
    light: &Light,
    sample: &crate::material::PbrSample,
    n: Vec3,
    v: Vec3,
    frag_pos: Vec3,
) -> Vec3 {
    let albedo = sample.base_color;
    let ambient_term = |ambient: Vec3| ambient * albedo * sample.ao;

    match light {
        Light::Directional { direction, color } => {
            let l = (-*direction).normalize();
            let radiance = color.diffuse * color.intensity;
            ambient_term(color.ambient)
                + calculate_radiance(n, v, l, albedo, sample.metallic, sample.roughness, sample.ao, radiance)
        }
        Light::Point {
            location,
            attenuation,
            color,
        } => {
            let to_light = *location - frag_pos;
            let distance = to_light.length();
            let l = to_light.normalize();
            let atten = point_light_attenuation(distance, attenuation);
            let radiance = color.diffuse * color.intensity * atten;
            ambient_term(color.ambient)
                + calculate_radiance(n, v, l, albedo, sample.metallic, sample.roughness, sample.ao, radiance)
        }
        Light::Spot {
            location,
            direction,
            angle_inner_cone: _,
            angle_outer_cone,
            attenuation_constant,
            attenuation,
            color,
        } => {
            let to_light = *location - frag_pos;
            let distance = to_light.length();
            let l = to_light.normalize();
            let cos_theta = l.dot(&(-*direction).normalize());
            let cos_outer = angle_outer_cone.cos();

            let ambient = ambient_term(color.ambient);

            if cos_theta <= cos_outer {
                return ambient;
            }

            // (cosAngle - coneCos) / (1 - coneCos), per the original's
            // `calculateRadiance`: the inner cone angle is not part of
            // this falloff at all.
            let denom = (1.0 - cos_outer).max(EPS);
            let falloff = ((cos_theta - cos_outer) / denom).clamp(0.0, 1.0).powf(*attenuation_constant);
            let atten = point_light_attenuation(distance, attenuation) * falloff;
            let radiance = color.diffuse * color.intensity * atten;
            ambient
                + calculate_radiance(n, v, l, albedo, sample.metallic, sample.roughness, sample.ao, radiance)
        }
    }
}
