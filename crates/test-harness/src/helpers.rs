//! Helper functions: error types, configuration builders, mesh math.

use pipe_tessellation::TriangleMesh;
use pipe_types::{FinishColor, PipeConfiguration, StandardFinish};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("dispatch error: {message}")]
    DispatchError { message: String },

    #[error("unexpected response: expected {expected}, got {actual}")]
    UnexpectedResponse { expected: String, actual: String },

    #[error("no mesh: {ctx}")]
    NoMesh { ctx: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Configuration Builders ──────────────────────────────────────────────────

/// A gray pipe with the given dimensions in millimeters.
pub fn pipe(outer_diameter: f64, wall_thickness: f64, length: f64) -> PipeConfiguration {
    PipeConfiguration::new(outer_diameter, wall_thickness, length, FinishColor::default())
}

/// A pipe in one of the catalog finishes.
pub fn pipe_in(
    outer_diameter: f64,
    wall_thickness: f64,
    length: f64,
    finish: StandardFinish,
) -> PipeConfiguration {
    PipeConfiguration::new(outer_diameter, wall_thickness, length, finish.into())
}

/// A pipe with an arbitrary color string.
pub fn custom_pipe(
    outer_diameter: f64,
    wall_thickness: f64,
    length: f64,
    color: &str,
) -> PipeConfiguration {
    PipeConfiguration::new(outer_diameter, wall_thickness, length, FinishColor::new(color))
}

// ── Mesh Math Utilities ─────────────────────────────────────────────────────

/// Axis-aligned bounding box of a mesh. Returns (min, max).
pub fn mesh_bounding_box(mesh: &TriangleMesh) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for chunk in mesh.positions.chunks_exact(3) {
        for i in 0..3 {
            min[i] = min[i].min(chunk[i]);
            max[i] = max[i].max(chunk[i]);
        }
    }
    (min, max)
}

/// Mean of the vertex positions. Ring vertices are evenly spaced, so for a
/// tube this lands on the axis midpoint.
pub fn mesh_vertex_centroid(mesh: &TriangleMesh) -> [f64; 3] {
    let n = mesh.vertex_count();
    if n == 0 {
        return [0.0; 3];
    }
    let mut sum = [0.0f64; 3];
    for chunk in mesh.positions.chunks_exact(3) {
        for i in 0..3 {
            sum[i] += f64::from(chunk[i]);
        }
    }
    sum.map(|s| s / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipe_kernel::geometry::point::Point3d;
    use pipe_kernel::geometry::vector::Vec3;

    fn unit_triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex(Point3d::new(0.0, 0.0, 0.0), Vec3::Z);
        let b = mesh.add_vertex(Point3d::new(1.0, 0.0, 0.0), Vec3::Z);
        let c = mesh.add_vertex(Point3d::new(0.0, 1.0, 0.0), Vec3::Z);
        mesh.add_triangle(a, b, c);
        mesh
    }

    #[test]
    fn builders_set_the_color() {
        assert!(!pipe(200.0, 8.0, 3000.0).color.is_custom());
        assert_eq!(
            pipe_in(100.0, 5.0, 1000.0, StandardFinish::Red).color.standard_finish(),
            Some(StandardFinish::Red)
        );
        assert!(custom_pipe(100.0, 5.0, 1000.0, "#123456").color.is_custom());
    }

    #[test]
    fn triangle_bounds_and_centroid() {
        let mesh = unit_triangle();
        let (min, max) = mesh_bounding_box(&mesh);
        assert_eq!(min, [0.0, 0.0, 0.0]);
        assert_eq!(max, [1.0, 1.0, 0.0]);
        let c = mesh_vertex_centroid(&mesh);
        assert!((c[0] - 1.0 / 3.0).abs() < 1e-6);
    }
}
