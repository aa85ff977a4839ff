use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::KernelError;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::topology::brep::*;

/// Volume, centroid and surface area of a closed solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub volume: f64,
    pub centroid: Point3d,
    pub surface_area: f64,
}

/// Integrate mass properties over the boundary triangles of a solid.
///
/// Each outward-wound triangle spans a signed tetrahedron with the origin;
/// summing those gives the enclosed volume and its first moment. Exact for
/// the faceted solid, so the only error against the smooth tube is the
/// polygonal sampling of its circles.
#[instrument(skip(store))]
pub fn mass_properties(store: &EntityStore, solid_id: SolidId) -> Result<MassProperties, KernelError> {
    let mut volume = 0.0;
    let mut moment = Vec3::ZERO;
    let mut surface_area = 0.0;

    for face_id in store.solid_faces(solid_id) {
        for [a, b, c] in store.face_triangles(face_id)? {
            let (a, b, c) = (a.to_vec3(), b.to_vec3(), c.to_vec3());
            let signed = a.triple(&b, &c) / 6.0;
            volume += signed;
            moment += (a + b + c) * (signed / 4.0);
            surface_area += 0.5 * (b - a).cross(&(c - a)).length();
        }
    }

    let centroid = if volume.abs() > f64::MIN_POSITIVE {
        let m = moment / volume;
        Point3d::new(m.x, m.y, m.z)
    } else {
        store.solid_bounding_box(solid_id).center()
    };

    debug!(volume, surface_area, ?centroid, "mass properties");
    Ok(MassProperties {
        volume,
        centroid,
        surface_area,
    })
}
