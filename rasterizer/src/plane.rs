//! Frustum planes extracted from a view-projection matrix (Gribb-Hartmann).

#![allow(dead_code)]

use crate::matrix::Mat4;
use crate::vector::Vec3;

#[derive(Copy, Clone, Debug)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub distance: f32,
}

impl Plane {
    pub fn new(a: f32, b: f32, c: f32, distance: f32) -> Plane {
        let mut p = Plane { a, b, c, distance };
        p.normalize();
        p
    }

    fn normalize(&mut self) {
        let len = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if len > 0.0 {
            let inv = 1.0 / len;
            self.a *= inv;
            self.b *= inv;
            self.c *= inv;
            self.distance *= inv;
        }
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }

    /// Signed distance from `p` to the plane; positive on the side the
    /// normal points toward (the inside of the frustum, for the six
    /// planes produced by `extract_frustum_planes`).
    pub fn distance_from_point(&self, p: &Vec3) -> f32 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.distance
    }
}

/// The six half-spaces of a frustum, in `[left, right, bottom, top, near, far]` order.
pub type FrustumPlanes = [Plane; 6];

/// Gribb-Hartmann extraction from `m = projection * view`, by adding or
/// subtracting rows of the combined matrix.
pub fn extract_frustum_planes(m: &Mat4) -> FrustumPlanes {
    let row = |i: usize| -> [f32; 4] { m.m[i] };
    let r0 = row(0);
    let r1 = row(1);
    let r2 = row(2);
    let r3 = row(3);

    let combine = |ra: [f32; 4], rb: [f32; 4], sign: f32| -> Plane {
        Plane::new(
            ra[0] + sign * rb[0],
            ra[1] + sign * rb[1],
            ra[2] + sign * rb[2],
            ra[3] + sign * rb[3],
        )
    };

    [
        combine(r3, r0, 1.0),  // left:   r3 + r0
        combine(r3, r0, -1.0), // right:  r3 - r0
        combine(r3, r1, 1.0),  // bottom: r3 + r1
        combine(r3, r1, -1.0), // top:    r3 - r1
        combine(r3, r2, 1.0),  // near:   r3 + r2
        combine(r3, r2, -1.0), // far:    r3 - r2
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    // The apex of the frustum (the camera's eye) sits exactly on the four
    // side planes and strictly behind the near plane by construction, so
    // it is not a meaningful "inside" probe. We check a point partway
    // down the view axis instead, which is what "camera is inside its
    // own frustum" is actually asserting: a well-formed projection sees
    // forward.
    #[test]
    fn point_in_front_of_camera_is_inside_its_own_frustum() {
        let cam = Camera::new(
            (120, 120),
            90.0,
            0.01,
            10.0,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::zero(),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let probe = cam.point_in_front(0.5);
        let planes = extract_frustum_planes(&cam.view_projection_matrix);
        for plane in planes {
            assert!(plane.distance_from_point(&probe) > 0.0);
        }
    }
}
