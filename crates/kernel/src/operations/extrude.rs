use std::f64::consts::TAU;

use tracing::{debug, info, instrument};

use crate::KernelError;
use crate::geometry::point::Point3d;
use crate::geometry::surfaces::{Cylinder, Plane, Surface};
use crate::geometry::vector::Vec3;
use crate::topology::brep::*;

/// A ring-shaped cross-section on the XY plane, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnularProfile {
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Samples around each circle.
    pub segments: usize,
}

impl AnnularProfile {
    pub const MIN_SEGMENTS: usize = 3;

    pub fn new(outer_radius: f64, inner_radius: f64, segments: usize) -> Result<Self, KernelError> {
        if segments < Self::MIN_SEGMENTS {
            return Err(KernelError::InsufficientSegments {
                required: Self::MIN_SEGMENTS,
                provided: segments,
            });
        }
        for (parameter, value) in [("outer radius", outer_radius), ("inner radius", inner_radius)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(KernelError::InvalidDimension { parameter, value });
            }
        }
        if inner_radius >= outer_radius {
            return Err(KernelError::ClosedBore {
                outer: outer_radius,
                inner: inner_radius,
            });
        }
        Ok(Self {
            outer_radius,
            inner_radius,
            segments,
        })
    }

    pub fn wall(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Area of the sampled (polygonal) ring.
    pub fn polygon_area(&self) -> f64 {
        let n = self.segments as f64;
        0.5 * n * (TAU / n).sin() * (self.outer_radius.powi(2) - self.inner_radius.powi(2))
    }
}

/// Linear extrusion parameters along +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    pub length: f64,
    /// Chamfer size at both ends; 0 for square ends.
    pub chamfer: f64,
}

/// One cross-section ring of the tube: height and the two radii there.
#[derive(Debug, Clone, Copy)]
struct Layer {
    z: f64,
    outer: f64,
    inner: f64,
}

/// Extrude an annular profile along +Z into a closed tube solid.
///
/// The solid starts at z = 0 and ends at z = `length`. With a chamfer `c`
/// the end faces shrink to radii `R - c` and `r + c`, and the full profile
/// is reached `c` from each end.
#[instrument(skip(store))]
pub fn extrude_annulus(
    store: &mut EntityStore,
    profile: &AnnularProfile,
    options: &ExtrudeOptions,
) -> Result<SolidId, KernelError> {
    let ExtrudeOptions { length, chamfer } = *options;
    if !length.is_finite() || length <= 0.0 {
        return Err(KernelError::InvalidDimension {
            parameter: "length",
            value: length,
        });
    }
    if !chamfer.is_finite() || chamfer < 0.0 {
        return Err(KernelError::InvalidDimension {
            parameter: "chamfer",
            value: chamfer,
        });
    }

    let (r_out, r_in) = (profile.outer_radius, profile.inner_radius);
    let tol = crate::default_tolerance();
    let layers = if tol.is_zero_length(chamfer) {
        vec![
            Layer { z: 0.0, outer: r_out, inner: r_in },
            Layer { z: length, outer: r_out, inner: r_in },
        ]
    } else {
        // The caps and the straight section must keep a width above tolerance.
        if 2.0 * chamfer >= profile.wall() - tol.coincidence
            || 2.0 * chamfer >= length - tol.coincidence
        {
            return Err(KernelError::ChamferTooLarge {
                chamfer,
                wall: profile.wall(),
                length,
            });
        }
        let cap = |z| Layer {
            z,
            outer: r_out - chamfer,
            inner: r_in + chamfer,
        };
        vec![
            cap(0.0),
            Layer { z: chamfer, outer: r_out, inner: r_in },
            Layer { z: length - chamfer, outer: r_out, inner: r_in },
            cap(length),
        ]
    };

    info!(
        outer_radius = r_out,
        inner_radius = r_in,
        segments = profile.segments,
        length,
        chamfer,
        layers = layers.len(),
        "extruding annular profile"
    );

    let n = profile.segments;
    let angle = |i: usize| TAU * (i as f64) / (n as f64);

    let mut outer_rings: Vec<Vec<VertexId>> = Vec::with_capacity(layers.len());
    let mut inner_rings: Vec<Vec<VertexId>> = Vec::with_capacity(layers.len());
    for layer in &layers {
        outer_rings.push(
            (0..n)
                .map(|i| store.add_vertex(Point3d::on_circle(layer.outer, angle(i), layer.z)))
                .collect(),
        );
        inner_rings.push(
            (0..n)
                .map(|i| store.add_vertex(Point3d::on_circle(layer.inner, angle(i), layer.z)))
                .collect(),
        );
    }

    let (solid_id, shell_id) = store.add_solid();
    let last = layers.len() - 1;

    // Start cap faces -Z: outer loop clockwise seen from +Z, hole counter-clockwise.
    store.add_face(
        shell_id,
        Surface::Plane(Plane::new(Point3d::ORIGIN, -Vec3::Z)),
        true,
        FaceRole::EndCapNegative,
        (0..n).map(|j| outer_rings[0][(n - j) % n]).collect(),
        vec![inner_rings[0].clone()],
    );

    // End cap faces +Z: mirror of the start cap.
    store.add_face(
        shell_id,
        Surface::Plane(Plane::new(Point3d::new(0.0, 0.0, length), Vec3::Z)),
        true,
        FaceRole::EndCapPositive,
        outer_rings[last].clone(),
        vec![(0..n).map(|j| inner_rings[last][(n - j) % n]).collect()],
    );

    for (l, pair) in layers.windows(2).enumerate() {
        let (lo, hi) = (pair[0], pair[1]);
        let straight_outer = lo.outer == hi.outer;
        let straight_inner = lo.inner == hi.inner;

        for i in 0..n {
            let next = (i + 1) % n;

            let outer_quad = vec![
                outer_rings[l][i],
                outer_rings[l][next],
                outer_rings[l + 1][next],
                outer_rings[l + 1][i],
            ];
            let (surface, role) = if straight_outer {
                (
                    Surface::Cylinder(Cylinder::new(Point3d::ORIGIN, Vec3::Z, lo.outer)),
                    FaceRole::OuterWall,
                )
            } else {
                (quad_plane(store, &outer_quad), FaceRole::OuterChamfer)
            };
            store.add_face(shell_id, surface, true, role, outer_quad, vec![]);

            // Bore faces look toward the axis, so the winding runs the other way.
            let inner_quad = vec![
                inner_rings[l][next],
                inner_rings[l][i],
                inner_rings[l + 1][i],
                inner_rings[l + 1][next],
            ];
            let (surface, same_sense, role) = if straight_inner {
                (
                    Surface::Cylinder(Cylinder::new(Point3d::ORIGIN, Vec3::Z, lo.inner)),
                    false,
                    FaceRole::Bore,
                )
            } else {
                (quad_plane(store, &inner_quad), true, FaceRole::BoreChamfer)
            };
            store.add_face(shell_id, surface, same_sense, role, inner_quad, vec![]);
        }
    }

    debug!(
        faces = store.shells[shell_id].faces.len(),
        vertices = 2 * n * layers.len(),
        "tube solid assembled"
    );
    Ok(solid_id)
}

fn quad_plane(store: &EntityStore, quad: &[VertexId]) -> Surface {
    let p = |i: usize| store.vertices[quad[i]].point;
    Surface::Plane(Plane::from_points(p(0), p(1), p(2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::brep::{TopologyCounts, audit_solid};
    use approx::assert_abs_diff_eq;

    fn tube(store: &mut EntityStore, segments: usize, chamfer: f64) -> SolidId {
        let profile = AnnularProfile::new(0.1, 0.092, segments).unwrap();
        extrude_annulus(store, &profile, &ExtrudeOptions { length: 3.0, chamfer }).unwrap()
    }

    fn role_count(store: &EntityStore, solid: SolidId, role: FaceRole) -> usize {
        store
            .solid_faces(solid)
            .iter()
            .filter(|&&f| store.faces[f].role == role)
            .count()
    }

    #[test]
    fn test_square_tube_topology() {
        let mut store = EntityStore::new();
        let n = 64;
        let solid = tube(&mut store, n, 0.0);

        let audit = audit_solid(&store, solid);
        assert_eq!(
            audit.counts,
            TopologyCounts {
                vertices: 4 * n,
                edges: 6 * n,
                faces: 2 + 2 * n,
                rings: 2
            }
        );
        assert_eq!(audit.genus, Some(1));
        assert!(audit.all_valid(), "{:?}", audit.errors);
        assert_eq!(role_count(&store, solid, FaceRole::OuterWall), n);
        assert_eq!(role_count(&store, solid, FaceRole::Bore), n);
        assert_eq!(role_count(&store, solid, FaceRole::OuterChamfer), 0);
    }

    #[test]
    fn test_chamfered_tube_topology() {
        let mut store = EntityStore::new();
        let n = 32;
        let solid = tube(&mut store, n, 0.001);

        let audit = audit_solid(&store, solid);
        assert_eq!(
            audit.counts,
            TopologyCounts {
                vertices: 8 * n,
                edges: 14 * n,
                faces: 2 + 6 * n,
                rings: 2
            }
        );
        assert_eq!(audit.genus, Some(1));
        assert!(audit.all_valid(), "{:?}", audit.errors);
        assert_eq!(role_count(&store, solid, FaceRole::OuterChamfer), 2 * n);
        assert_eq!(role_count(&store, solid, FaceRole::BoreChamfer), 2 * n);
    }

    #[test]
    fn test_tube_bounding_box() {
        let mut store = EntityStore::new();
        let solid = tube(&mut store, 64, 0.0);
        let bb = store.solid_bounding_box(solid);
        assert_abs_diff_eq!(bb.min.x, -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.max.x, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.min.y, -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.max.y, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.min.z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.max.z, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bore_normals_point_at_axis() {
        let mut store = EntityStore::new();
        let solid = tube(&mut store, 32, 0.0);
        for face in store.solid_faces(solid) {
            let p = store.loop_points(store.faces[face].outer_loop)[0];
            let n = store.face_normal_at(face, &p);
            let radial = Vec3::new(p.x, p.y, 0.0);
            match store.faces[face].role {
                FaceRole::OuterWall => assert!(n.dot(&radial) > 0.0),
                FaceRole::Bore => assert!(n.dot(&radial) < 0.0),
                FaceRole::EndCapNegative => assert_eq!(n, -Vec3::Z),
                FaceRole::EndCapPositive => assert_eq!(n, Vec3::Z),
                _ => {}
            }
        }
    }

    #[test]
    fn test_invalid_profiles() {
        assert_eq!(
            AnnularProfile::new(0.1, 0.1, 64),
            Err(KernelError::ClosedBore { outer: 0.1, inner: 0.1 })
        );
        assert!(matches!(
            AnnularProfile::new(0.1, 0.0, 64),
            Err(KernelError::InvalidDimension { parameter: "inner radius", .. })
        ));
        assert!(matches!(
            AnnularProfile::new(0.1, 0.05, 2),
            Err(KernelError::InsufficientSegments { required: 3, provided: 2 })
        ));
        assert!(matches!(
            AnnularProfile::new(f64::NAN, 0.05, 64),
            Err(KernelError::InvalidDimension { .. })
        ));
    }

    fn chamfered(profile: &AnnularProfile, length: f64, chamfer: f64) -> Result<SolidId, KernelError> {
        let mut store = EntityStore::new();
        extrude_annulus(&mut store, profile, &ExtrudeOptions { length, chamfer })
    }

    #[test]
    fn test_oversized_chamfer_rejected() {
        let profile = AnnularProfile::new(0.1, 0.098, 32).unwrap();
        // Half the wall leaves end caps of zero width, up to rounding.
        assert!(matches!(
            chamfered(&profile, 1.0, 0.001),
            Err(KernelError::ChamferTooLarge { .. })
        ));
        assert!(matches!(
            chamfered(&profile, 1.0, 0.005),
            Err(KernelError::ChamferTooLarge { .. })
        ));
        assert!(chamfered(&profile, 1.0, 0.0009).is_ok());
    }

    #[test]
    fn test_chamfer_must_fit_the_length() {
        let profile = AnnularProfile::new(0.1, 0.05, 32).unwrap();
        assert!(matches!(
            chamfered(&profile, 0.02, 0.01),
            Err(KernelError::ChamferTooLarge { .. })
        ));
        assert!(chamfered(&profile, 0.03, 0.01).is_ok());
    }

    #[test]
    fn test_polygon_area_converges_to_ring() {
        let coarse = AnnularProfile::new(1.0, 0.5, 8).unwrap();
        let fine = AnnularProfile::new(1.0, 0.5, 256).unwrap();
        assert!(coarse.polygon_area() < fine.polygon_area());
        assert_abs_diff_eq!(fine.polygon_area(), std::f64::consts::PI * 0.75, epsilon = 1e-3);
    }
}
