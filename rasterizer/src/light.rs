//! Light is a sum type over its three variants, each carrying exactly
//! the fields it needs (per the design note replacing the source's
//! runtime tag dispatch with a pattern match).

#![allow(dead_code)]

use crate::vector::Vec3;

#[derive(Copy, Clone, Debug)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Attenuation {
        Attenuation {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct LightColor {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub intensity: f32,
}

#[derive(Copy, Clone, Debug)]
pub enum Light {
    Directional {
        direction: Vec3,
        color: LightColor,
    },
    Point {
        location: Vec3,
        attenuation: Attenuation,
        color: LightColor,
    },
    Spot {
        location: Vec3,
        direction: Vec3,
        angle_inner_cone: f32,
        angle_outer_cone: f32,
        attenuation_constant: f32,
        attenuation: Attenuation,
        color: LightColor,
    },
}
