//! Axis-aligned bounding box and its frustum classification test.

#![allow(dead_code)]

use crate::plane::FrustumPlanes;
use crate::vector::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FrustumTest {
    Inside,
    Outside,
    Intersecting,
}

#[derive(Copy, Clone, Debug)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// An already-empty box (`Outside` every plane until points are
    /// added). Deliberately `+INFINITY`/`-INFINITY`, not `f32::MIN`/
    /// `f32::MAX` — the latter is the teacher's latent bug (`f32::MIN`
    /// is the smallest *positive* normal float, not negative infinity)
    /// and spec.md calls it out as not to be replicated.
    pub fn empty() -> BoundingBox {
        BoundingBox {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Vec3]) -> BoundingBox {
        let mut b = BoundingBox::empty();
        for p in points {
            b.extend(*p);
        }
        b
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(&p);
        self.max = self.max.max(&p);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// One of the 8 corners, selected per axis by bit 0/1/2 of `i`.
    pub fn corner(&self, i: u32) -> Vec3 {
        Vec3::new(
            if i & 1 != 0 { self.max.x } else { self.min.x },
            if i & 2 != 0 { self.max.y } else { self.min.y },
            if i & 4 != 0 { self.max.z } else { self.min.z },
        )
    }

    /// Classic positive/negative-corner test against a six-plane frustum.
    pub fn classify_frustum(&self, planes: &FrustumPlanes) -> FrustumTest {
        let mut intersecting = false;
        for plane in planes {
            let normal = plane.normal();

            // Corner farthest along the plane normal (most likely to be
            // in front) and the opposite corner (most likely to be behind).
            let positive = Vec3::new(
                if normal.x >= 0.0 { self.max.x } else { self.min.x },
                if normal.y >= 0.0 { self.max.y } else { self.min.y },
                if normal.z >= 0.0 { self.max.z } else { self.min.z },
            );
            let negative = Vec3::new(
                if normal.x >= 0.0 { self.min.x } else { self.max.x },
                if normal.y >= 0.0 { self.min.y } else { self.max.y },
                if normal.z >= 0.0 { self.min.z } else { self.max.z },
            );

            if plane.distance_from_point(&positive) < 0.0 {
                return FrustumTest::Outside;
            }
            if plane.distance_from_point(&negative) < 0.0 {
                intersecting = true;
            }
        }
        if intersecting {
            FrustumTest::Intersecting
        } else {
            FrustumTest::Inside
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

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

    #[test]
    fn box_at_origin_is_inside() {
        let cam = camera();
        let planes = crate::plane::extract_frustum_planes(&cam.view_projection_matrix);
        let b = BoundingBox::from_points(&[Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.5, 0.5, 0.0)]);
        assert_eq!(b.classify_frustum(&planes), FrustumTest::Inside);
    }

    #[test]
    fn box_behind_camera_is_outside() {
        let cam = camera();
        let planes = crate::plane::extract_frustum_planes(&cam.view_projection_matrix);
        let b = BoundingBox::from_points(&[Vec3::new(-0.5, -0.5, 5.0), Vec3::new(0.5, 0.5, 6.0)]);
        assert_eq!(b.classify_frustum(&planes), FrustumTest::Outside);
    }

    #[test]
    fn empty_box_is_outside() {
        let cam = camera();
        let planes = crate::plane::extract_frustum_planes(&cam.view_projection_matrix);
        assert_eq!(BoundingBox::empty().classify_frustum(&planes), FrustumTest::Outside);
    }
}
