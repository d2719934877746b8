//! Camera: resolution + projection parameters, with derived matrices
//! recomputed whenever the camera is (re)constructed or retargeted.

#![allow(dead_code)]

use crate::matrix::Mat4;
use crate::vector::Vec3;

#[derive(Copy, Clone, Debug)]
pub struct Camera {
    pub resolution: (u32, u32),
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,

    location: Vec3,
    target: Vec3,
    up: Vec3,

    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    pub view_projection_matrix: Mat4,
    pub inverse_view_matrix: Mat4,
    pub inverse_projection_matrix: Mat4,
}

impl Camera {
    pub fn new(
        resolution: (u32, u32),
        fov_y_degrees: f32,
        z_near: f32,
        z_far: f32,
        location: Vec3,
        target: Vec3,
        up: Vec3,
    ) -> Camera {
        let mut cam = Camera {
            resolution,
            fov_y_degrees,
            z_near,
            z_far,
            location,
            target,
            up,
            view_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
            view_projection_matrix: Mat4::identity(),
            inverse_view_matrix: Mat4::identity(),
            inverse_projection_matrix: Mat4::identity(),
        };
        cam.recompute_matrices();
        cam
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// A point along the view axis known to sit strictly inside the
    /// frustum (used by frustum-plane sanity checks — the apex itself
    /// sits on/behind the near plane by construction, so it is not a
    /// useful "is this point inside" probe).
    pub fn point_in_front(&self, distance: f32) -> Vec3 {
        let forward = (self.target - self.location).normalize();
        self.location + forward * distance
    }

    /// Recompute every derived matrix from `location`/`target`/`up` and
    /// the projection parameters. Must be called whenever any of those
    /// change before the camera is used to render (the invariant from
    /// the data model: derived matrices are never stale at render time).
    pub fn recompute_matrices(&mut self) {
        self.view_matrix = Mat4::look_at(self.location, self.target, self.up);
        self.projection_matrix = Mat4::perspective(
            self.fov_y_degrees,
            self.resolution.0 as f32,
            self.resolution.1 as f32,
            self.z_near,
            self.z_far,
        );
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
        self.inverse_view_matrix = self.view_matrix.inverse();
        self.inverse_projection_matrix = self.projection_matrix.inverse();
    }

    pub fn set_look_at(&mut self, location: Vec3, target: Vec3, up: Vec3) {
        self.location = location;
        self.target = target;
        self.up = up;
        self.recompute_matrices();
    }

    /// World-space eye position, recovered from column 3 of the inverse
    /// view matrix (used by the fragment shader for the view vector).
    pub fn world_position_from_inverse_view(inverse_view: &Mat4) -> Vec3 {
        Vec3::new(
            inverse_view.m[0][3],
            inverse_view.m[1][3],
            inverse_view.m[2][3],
        )
    }
}
