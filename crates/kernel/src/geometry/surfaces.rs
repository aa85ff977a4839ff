use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::transform::Transform;
use super::vector::Vec3;

/// Surfaces a face can lie on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    Plane(Plane),
    Cylinder(Cylinder),
}

impl Surface {
    /// Surface normal at a point on (or near) the surface.
    pub fn normal_at_point(&self, p: &Point3d) -> Vec3 {
        match self {
            Surface::Plane(plane) => plane.normal,
            Surface::Cylinder(cyl) => cyl.normal_at_point(p),
        }
    }

    /// Apply a rigid transform to the surface definition.
    pub fn transformed(&self, t: &Transform) -> Surface {
        match self {
            Surface::Plane(plane) => Surface::Plane(Plane {
                origin: t.transform_point(&plane.origin),
                normal: t.transform_vector(&plane.normal),
            }),
            Surface::Cylinder(cyl) => Surface::Cylinder(Cylinder {
                origin: t.transform_point(&cyl.origin),
                axis: t.transform_vector(&cyl.axis),
                radius: cyl.radius,
            }),
        }
    }
}

/// An infinite plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
}

impl Plane {
    /// Plane through `origin`. A zero normal falls back to +Z.
    pub fn new(origin: Point3d, normal: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalized().unwrap_or(Vec3::Z),
        }
    }

    /// Plane through three points, oriented by their winding (counter-clockwise = front).
    pub fn from_points(a: Point3d, b: Point3d, c: Point3d) -> Self {
        Self::new(a, (b - a).cross(&(c - a)))
    }

    pub fn distance_to_point(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }
}

/// An infinite circular cylinder. The surface normal points away from the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    /// A point on the axis.
    pub origin: Point3d,
    /// Unit axis direction.
    pub axis: Vec3,
    pub radius: f64,
}

impl Cylinder {
    pub fn new(origin: Point3d, axis: Vec3, radius: f64) -> Self {
        Self {
            origin,
            axis: axis.normalized().unwrap_or(Vec3::Z),
            radius,
        }
    }

    pub fn normal_at_point(&self, p: &Point3d) -> Vec3 {
        let v = *p - self.origin;
        let radial = v - self.axis * v.dot(&self.axis);
        radial.normalized().unwrap_or(Vec3::X)
    }
}
