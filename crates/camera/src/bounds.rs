use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Result of testing a volume against another volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainmentType {
    /// No overlap at all.
    Disjoint,
    /// Fully inside.
    Contains,
    /// Straddles at least one boundary.
    Intersects,
}

/// Sphere bounding a mesh in its local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Move the sphere into the space described by `matrix`.
    ///
    /// The radius grows by the largest axis scale, so the result still bounds
    /// the transformed geometry under non-uniform scaling.
    pub fn transform(&self, matrix: &Mat4) -> BoundingSphere {
        let scale = matrix
            .x_axis
            .truncate()
            .length()
            .max(matrix.y_axis.truncate().length())
            .max(matrix.z_axis.truncate().length());
        BoundingSphere {
            center: matrix.transform_point3(self.center),
            radius: self.radius * scale,
        }
    }

    /// Smallest sphere enclosing both spheres.
    pub fn merge(&self, other: &BoundingSphere) -> BoundingSphere {
        let offset = other.center - self.center;
        let distance = offset.length();
        if distance + other.radius <= self.radius {
            return *self;
        }
        if distance + self.radius <= other.radius {
            return *other;
        }
        let radius = (distance + self.radius + other.radius) * 0.5;
        let center = self.center + offset * ((radius - self.radius) / distance);
        BoundingSphere { center, radius }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_sphere(sphere: &BoundingSphere) -> Self {
        let extent = Vec3::splat(sphere.radius);
        Self {
            min: sphere.center - extent,
            max: sphere.center + extent,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_translates_center() {
        let sphere = BoundingSphere::new(Vec3::ZERO, 2.0);
        let moved = sphere.transform(&Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(moved.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.radius, 2.0);
    }

    #[test]
    fn transform_uses_largest_scale() {
        let sphere = BoundingSphere::new(Vec3::ZERO, 1.0);
        let scaled = sphere.transform(&Mat4::from_scale(Vec3::new(1.0, 3.0, 2.0)));
        assert!((scaled.radius - 3.0).abs() < 1e-6);
    }

    #[test]
    fn merge_disjoint_spheres() {
        let a = BoundingSphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0);
        let b = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let merged = a.merge(&b);
        assert!(merged.center.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!((merged.radius - 3.0).abs() < 1e-6);
    }

    #[test]
    fn merge_keeps_enclosing_sphere() {
        let big = BoundingSphere::new(Vec3::ZERO, 10.0);
        let small = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        assert_eq!(big.merge(&small), big);
        assert_eq!(small.merge(&big), big);
    }

    #[test]
    fn box_from_sphere_contains_center() {
        let sphere = BoundingSphere::new(Vec3::new(1.0, 1.0, 1.0), 0.5);
        let aabb = BoundingBox::from_sphere(&sphere);
        assert!(aabb.contains_point(sphere.center));
        assert_eq!(aabb.center(), sphere.center);
        assert!(!aabb.contains_point(Vec3::ZERO));
    }
}
