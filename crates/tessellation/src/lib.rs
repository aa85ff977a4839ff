use std::collections::HashMap;

use pipe_kernel::KernelError;
use pipe_kernel::geometry::point::Point3d;
use pipe_kernel::geometry::transform::BoundingBox;
use pipe_kernel::geometry::vector::Vec3;
use pipe_kernel::topology::brep::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn add_vertex(&mut self, pos: Point3d, normal: Vec3) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions.push(pos.x as f32);
        self.positions.push(pos.y as f32);
        self.positions.push(pos.z as f32);
        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        for &idx in &other.indices {
            self.indices.push(idx + offset);
        }
    }

    pub fn position(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    pub fn normal(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.normals[i], self.normals[i + 1], self.normals[i + 2]]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for p in self.positions.chunks_exact(3) {
            bb.expand_to_include(&Point3d::new(p[0] as f64, p[1] as f64, p[2] as f64));
        }
        bb
    }

    /// Enclosed volume, positive when triangles wind outward.
    pub fn signed_volume(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| {
                    let [x, y, z] = self.position(i);
                    Vec3::new(x as f64, y as f64, z as f64)
                });
                a.triple(&b, &c) / 6.0
            })
            .sum()
    }

    /// Edge usage after welding vertices that share an exact position.
    ///
    /// Faces are tessellated with their own vertices so each can carry its
    /// own normals; welding recovers the shared boundary between them.
    pub fn edge_report(&self) -> EdgeReport {
        let mut welded: HashMap<[u32; 3], usize> = HashMap::new();
        let ids: Vec<usize> = self
            .positions
            .chunks_exact(3)
            .map(|p| {
                let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
                let next = welded.len();
                *welded.entry(key).or_insert(next)
            })
            .collect();

        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for k in 0..3 {
                let a = ids[tri[k] as usize];
                let b = ids[tri[(k + 1) % 3] as usize];
                *directed.entry((a, b)).or_default() += 1;
            }
        }

        let mut report = EdgeReport {
            welded_vertices: welded.len(),
            ..EdgeReport::default()
        };
        for (&(a, b), &forward) in &directed {
            let backward = directed.get(&(b, a)).copied().unwrap_or(0);
            if backward > 0 && b < a {
                continue;
            }
            report.edges += 1;
            match (forward, backward) {
                (1, 1) => {}
                (_, 0) | (0, _) => report.boundary += 1,
                (f, b) if f + b > 2 => report.non_manifold += 1,
                _ => report.inconsistent += 1,
            }
        }
        report
    }
}

/// Summary of edge sharing in a welded triangle mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeReport {
    pub welded_vertices: usize,
    pub edges: usize,
    /// Edges used by a single triangle.
    pub boundary: usize,
    pub non_manifold: usize,
    /// Edges whose two triangles traverse them in the same direction.
    pub inconsistent: usize,
}

impl EdgeReport {
    pub fn is_closed_manifold(&self) -> bool {
        self.boundary == 0 && self.non_manifold == 0 && self.inconsistent == 0
    }
}

/// Tessellate a single face. Each vertex carries the face normal at that
/// point, so cylinder walls shade smoothly and planes stay flat.
pub fn tessellate_face(store: &EntityStore, face_id: FaceId) -> Result<TriangleMesh, KernelError> {
    let mut mesh = TriangleMesh::new();
    for tri in store.face_triangles(face_id)? {
        let [i0, i1, i2] = tri.map(|p| mesh.add_vertex(p, store.face_normal_at(face_id, &p)));
        mesh.add_triangle(i0, i1, i2);
    }
    Ok(mesh)
}

/// Tessellate an entire solid into a triangle mesh.
#[instrument(skip(store))]
pub fn tessellate_solid(store: &EntityStore, solid_id: SolidId) -> Result<TriangleMesh, KernelError> {
    let mut mesh = TriangleMesh::new();
    for face_id in store.solid_faces(solid_id) {
        let face_mesh = tessellate_face(store, face_id)?;
        mesh.merge(&face_mesh);
    }
    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "solid tessellated"
    );
    Ok(mesh)
}
