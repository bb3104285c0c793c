//! View frustum as six inward-facing planes.
//!
//! A plane is stored as `(A, B, C, D)` with `(A, B, C)` the unit inward normal.
//! A point `P` is on the visible side when `A·Px + B·Py + C·Pz + D >= 0`.

use glam::{Mat4, Vec3, Vec4};

use crate::bounds::{BoundingBox, BoundingSphere, ContainmentType};

pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Frustum extracted from a view-projection matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingFrustum {
    matrix: Mat4,
    planes: [Vec4; 6],
}

impl BoundingFrustum {
    /// Extract the planes of `view_projection` (column-vector convention,
    /// clip depth in `0..1`).
    ///
    /// Gribb & Hartmann row combinations; the near plane is row 2 alone
    /// because depth starts at zero.
    pub fn from_matrix(view_projection: Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        let mut planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2];
        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self {
            matrix: view_projection,
            planes,
        }
    }

    /// The matrix the planes were extracted from.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    pub fn plane(&self, index: usize) -> Option<Vec4> {
        self.planes.get(index).copied()
    }

    fn distance(plane: Vec4, point: Vec3) -> f32 {
        plane.truncate().dot(point) + plane.w
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| Self::distance(*p, point) >= 0.0)
    }

    pub fn contains_sphere(&self, sphere: &BoundingSphere) -> ContainmentType {
        let mut result = ContainmentType::Contains;
        for plane in &self.planes {
            let d = Self::distance(*plane, sphere.center);
            if d < -sphere.radius {
                return ContainmentType::Disjoint;
            }
            if d < sphere.radius {
                result = ContainmentType::Intersects;
            }
        }
        result
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.contains_sphere(sphere) != ContainmentType::Disjoint
    }

    /// Three-way box test using the positive/negative vertex of each plane.
    pub fn contains_box(&self, aabb: &BoundingBox) -> ContainmentType {
        let mut result = ContainmentType::Contains;
        for plane in &self.planes {
            let normal = plane.truncate();
            let positive = Vec3::select(normal.cmpge(Vec3::ZERO), aabb.max, aabb.min);
            if Self::distance(*plane, positive) < 0.0 {
                return ContainmentType::Disjoint;
            }
            let negative = Vec3::select(normal.cmpge(Vec3::ZERO), aabb.min, aabb.max);
            if Self::distance(*plane, negative) < 0.0 {
                result = ContainmentType::Intersects;
            }
        }
        result
    }

    pub fn intersects_box(&self, aabb: &BoundingBox) -> bool {
        self.contains_box(aabb) != ContainmentType::Disjoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn test_frustum() -> BoundingFrustum {
        let projection = Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        BoundingFrustum::from_matrix(projection * view)
    }

    #[test]
    fn planes_are_normalized() {
        for plane in test_frustum().planes() {
            assert!((plane.truncate().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn identity_matrix_gives_unit_cube() {
        let frustum = BoundingFrustum::from_matrix(Mat4::IDENTITY);
        assert!(frustum.contains_point(Vec3::new(0.5, -0.5, 0.5)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -0.5)));
        assert!(!frustum.contains_point(Vec3::new(1.5, 0.0, 0.5)));
    }

    #[test]
    fn target_is_visible() {
        assert!(test_frustum().contains_point(Vec3::ZERO));
    }

    #[test]
    fn point_behind_camera_is_not_visible() {
        assert!(!test_frustum().contains_point(Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn near_plane_clips() {
        let frustum = test_frustum();
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 4.95)));
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, 4.8)));
    }

    #[test]
    fn far_plane_clips() {
        let frustum = test_frustum();
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -90.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -96.0)));
    }

    #[test]
    fn plane_lookup() {
        let frustum = test_frustum();
        assert_eq!(frustum.plane(PLANE_NEAR), Some(frustum.planes()[4]));
        assert!(frustum.plane(6).is_none());
        assert_eq!(PLANE_LEFT, 0);
        assert_eq!(PLANE_FAR, 5);
    }

    #[test]
    fn sphere_classification() {
        let frustum = test_frustum();
        let inside = BoundingSphere::new(Vec3::ZERO, 1.0);
        let straddling = BoundingSphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let outside = BoundingSphere::new(Vec3::new(0.0, 0.0, 20.0), 1.0);
        assert_eq!(frustum.contains_sphere(&inside), ContainmentType::Contains);
        assert_eq!(frustum.contains_sphere(&straddling), ContainmentType::Intersects);
        assert_eq!(frustum.contains_sphere(&outside), ContainmentType::Disjoint);
        assert!(frustum.intersects_sphere(&straddling));
        assert!(!frustum.intersects_sphere(&outside));
    }

    #[test]
    fn box_classification() {
        let frustum = test_frustum();
        let inside = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let far_away = BoundingBox::new(Vec3::splat(100.0), Vec3::splat(101.0));
        let straddling = BoundingBox::new(Vec3::new(-1.0, -1.0, 4.0), Vec3::new(1.0, 1.0, 6.0));
        assert_eq!(frustum.contains_box(&inside), ContainmentType::Contains);
        assert_eq!(frustum.contains_box(&far_away), ContainmentType::Disjoint);
        assert_eq!(frustum.contains_box(&straddling), ContainmentType::Intersects);
        assert!(!frustum.intersects_box(&far_away));
    }
}
