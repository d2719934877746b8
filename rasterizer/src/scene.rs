//! Immutable scene description: a shallow tree of arrays. `Mesh` to
//! `Material` is a lookup by index, never an owning pointer — there
//! are no cyclic references in the core.

#![allow(dead_code)]

use std::collections::HashMap;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;

#[derive(Default)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub cameras: Vec<Camera>,
    pub lights: Vec<Light>,
    pub materials: HashMap<u32, Material>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn material_for(&self, mesh: &Mesh) -> Material {
        self.materials
            .get(&mesh.material_index)
            .cloned()
            .unwrap_or_default()
    }
}
