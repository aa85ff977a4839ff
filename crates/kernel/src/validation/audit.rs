use tracing::{info, instrument};

use crate::geometry::surfaces::Surface;
use crate::topology::brep::*;

/// Verification passes for tube solids.
/// These checks are meant to be run automatically in tests and debug builds.

/// L0: Topological invariant checks.
#[instrument(skip(store))]
pub fn verify_topology(store: &EntityStore, solid_id: SolidId) -> TopologyAudit {
    let audit = audit_solid(store, solid_id);
    info!(
        vertices = audit.counts.vertices,
        edges = audit.counts.edges,
        faces = audit.counts.faces,
        genus = audit.genus,
        all_edges_two_faced = audit.all_edges_two_faced,
        orientation_consistent = audit.orientation_consistent,
        error_count = audit.errors.len(),
        "topology audit complete"
    );
    audit
}

/// L1: every loop vertex lies on the surface of its face.
#[instrument(skip(store))]
pub fn verify_geometry(store: &EntityStore, solid_id: SolidId) -> Vec<GeometryError> {
    let geom_tol = crate::default_tolerance().coincidence;
    let mut errors = Vec::new();

    for face_id in store.solid_faces(solid_id) {
        let surface = store.faces[face_id].surface;
        for loop_id in store.face_loops(face_id) {
            for &vertex in &store.loops[loop_id].vertices {
                let p = store.vertices[vertex].point;
                let distance = match surface {
                    Surface::Plane(plane) => plane.distance_to_point(&p).abs(),
                    Surface::Cylinder(cyl) => {
                        let v = p - cyl.origin;
                        let radial = v - cyl.axis * v.dot(&cyl.axis);
                        (radial.length() - cyl.radius).abs()
                    }
                };
                if distance > geom_tol {
                    errors.push(GeometryError::VertexOffSurface {
                        face: face_id,
                        vertex,
                        distance,
                    });
                }
            }
        }
    }

    info!(
        geometry_error_count = errors.len(),
        "geometry check complete"
    );
    errors
}

#[derive(Debug, Clone)]
pub enum GeometryError {
    VertexOffSurface {
        face: FaceId,
        vertex: VertexId,
        distance: f64,
    },
}
