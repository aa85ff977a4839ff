use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::KernelError;
use crate::geometry::point::Point3d;
use crate::geometry::surfaces::Surface;
use crate::geometry::transform::{BoundingBox, Transform};
use crate::geometry::vector::Vec3;

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct VertexId;
    pub struct LoopId;
    pub struct FaceId;
    pub struct ShellId;
    pub struct SolidId;
}

// ─── Topological Entities ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub point: Point3d,
    pub tolerance: f64,
}

/// A closed chain of vertices. Edges are the consecutive pairs, wrapping around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loop {
    pub vertices: Vec<VertexId>,
    pub face: FaceId,
}

/// What part of the tube a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceRole {
    /// The end face at the start of the extrusion.
    EndCapNegative,
    /// The end face at the far end of the extrusion.
    EndCapPositive,
    OuterWall,
    Bore,
    OuterChamfer,
    BoreChamfer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub surface: Surface,
    pub outer_loop: LoopId,
    pub inner_loops: Vec<LoopId>,
    /// true if the face normal agrees with the surface normal.
    pub same_sense: bool,
    pub shell: ShellId,
    pub role: FaceRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellOrientation {
    /// Outer shell (normals point outward).
    Outward,
    /// Void shell (normals point inward, represents a cavity).
    Inward,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shell {
    pub faces: Vec<FaceId>,
    pub orientation: ShellOrientation,
    pub solid: SolidId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solid {
    pub shells: Vec<ShellId>,
}

/// Entity counts of a shell. Edges are derived from loop adjacency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    /// Inner loops (holes in faces).
    pub rings: usize,
}

impl TopologyCounts {
    /// V - E + F - R. Equals 2(1 - genus) for a closed connected shell.
    pub fn euler_poincare(&self) -> i64 {
        self.vertices as i64 - self.edges as i64 + self.faces as i64 - self.rings as i64
    }
}

// ─── Entity Store ────────────────────────────────────────────────────────────

/// Arena-based storage for all topological entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    pub vertices: SlotMap<VertexId, Vertex>,
    pub loops: SlotMap<LoopId, Loop>,
    pub faces: SlotMap<FaceId, Face>,
    pub shells: SlotMap<ShellId, Shell>,
    pub solids: SlotMap<SolidId, Solid>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, point: Point3d) -> VertexId {
        self.vertices.insert(Vertex {
            point,
            tolerance: crate::default_tolerance().coincidence,
        })
    }

    /// Create an empty solid with one outward shell.
    pub fn add_solid(&mut self) -> (SolidId, ShellId) {
        let solid_id = self.solids.insert(Solid { shells: vec![] });
        let shell_id = self.shells.insert(Shell {
            faces: vec![],
            orientation: ShellOrientation::Outward,
            solid: solid_id,
        });
        self.solids[solid_id].shells.push(shell_id);
        (solid_id, shell_id)
    }

    /// Add a face bounded by `outer` with optional holes.
    ///
    /// The outer loop must run counter-clockwise seen from the face's front
    /// side; inner loops run the other way.
    pub fn add_face(
        &mut self,
        shell_id: ShellId,
        surface: Surface,
        same_sense: bool,
        role: FaceRole,
        outer: Vec<VertexId>,
        inner: Vec<Vec<VertexId>>,
    ) -> FaceId {
        let outer_loop = self.loops.insert(Loop {
            vertices: outer,
            face: FaceId::default(),
        });
        let inner_loops: Vec<LoopId> = inner
            .into_iter()
            .map(|vertices| {
                self.loops.insert(Loop {
                    vertices,
                    face: FaceId::default(),
                })
            })
            .collect();

        let face_id = self.faces.insert(Face {
            surface,
            outer_loop,
            inner_loops: inner_loops.clone(),
            same_sense,
            shell: shell_id,
            role,
        });

        self.loops[outer_loop].face = face_id;
        for loop_id in inner_loops {
            self.loops[loop_id].face = face_id;
        }
        self.shells[shell_id].faces.push(face_id);
        face_id
    }

    pub fn loop_points(&self, loop_id: LoopId) -> Vec<Point3d> {
        self.loops[loop_id]
            .vertices
            .iter()
            .map(|&v| self.vertices[v].point)
            .collect()
    }

    /// All faces of a solid, shell by shell.
    pub fn solid_faces(&self, solid_id: SolidId) -> Vec<FaceId> {
        self.solids[solid_id]
            .shells
            .iter()
            .flat_map(|&shell_id| self.shells[shell_id].faces.iter().copied())
            .collect()
    }

    /// Every loop of a face, outer first.
    pub fn face_loops(&self, face_id: FaceId) -> impl Iterator<Item = LoopId> + '_ {
        let face = &self.faces[face_id];
        std::iter::once(face.outer_loop).chain(face.inner_loops.iter().copied())
    }

    /// Distinct vertices referenced by a solid's loops.
    pub fn solid_vertices(&self, solid_id: SolidId) -> BTreeSet<VertexId> {
        self.solid_faces(solid_id)
            .into_iter()
            .flat_map(|face_id| self.face_loops(face_id).collect::<Vec<_>>())
            .flat_map(|loop_id| self.loops[loop_id].vertices.iter().copied())
            .collect()
    }

    /// Directed edge usage of a shell: (start, end) -> number of loops traversing it.
    pub fn directed_edges(&self, shell_id: ShellId) -> HashMap<(VertexId, VertexId), usize> {
        let mut edges = HashMap::new();
        for &face_id in &self.shells[shell_id].faces {
            for loop_id in self.face_loops(face_id) {
                let verts = &self.loops[loop_id].vertices;
                for (i, &start) in verts.iter().enumerate() {
                    let end = verts[(i + 1) % verts.len()];
                    *edges.entry((start, end)).or_insert(0) += 1;
                }
            }
        }
        edges
    }

    /// Count topological entities for a shell.
    pub fn count_topology(&self, shell_id: ShellId) -> TopologyCounts {
        let shell = &self.shells[shell_id];
        let mut vertices = BTreeSet::new();
        let mut edges = BTreeSet::new();

        for (&(a, b), _) in &self.directed_edges(shell_id) {
            vertices.insert(a);
            vertices.insert(b);
            edges.insert(if a < b { (a, b) } else { (b, a) });
        }

        TopologyCounts {
            vertices: vertices.len(),
            edges: edges.len(),
            faces: shell.faces.len(),
            rings: shell
                .faces
                .iter()
                .map(|&f| self.faces[f].inner_loops.len())
                .sum(),
        }
    }

    /// Compute axis-aligned bounding box for a solid.
    pub fn solid_bounding_box(&self, solid_id: SolidId) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for v in self.solid_vertices(solid_id) {
            bb.expand_to_include(&self.vertices[v].point);
        }
        bb
    }

    /// Outward normal of a face at a point on it.
    pub fn face_normal_at(&self, face_id: FaceId, p: &Point3d) -> Vec3 {
        let face = &self.faces[face_id];
        let n = face.surface.normal_at_point(p);
        if face.same_sense { n } else { -n }
    }

    /// Split a face into triangles wound to match its outward normal.
    ///
    /// Faces without holes are fanned from their first vertex, so they must be
    /// convex. A face with one hole is treated as a ring: the hole must have
    /// as many vertices as the outer loop and, read backwards starting from
    /// its first vertex, line up index by index with it.
    pub fn face_triangles(&self, face_id: FaceId) -> Result<Vec<[Point3d; 3]>, KernelError> {
        let face = &self.faces[face_id];
        let outer = self.loop_points(face.outer_loop);
        let n = outer.len();
        if n < 3 {
            return Err(KernelError::UnsupportedFace {
                reason: format!("outer loop has {n} vertices"),
            });
        }

        match face.inner_loops.as_slice() {
            [] => Ok((1..n - 1)
                .map(|i| [outer[0], outer[i], outer[i + 1]])
                .collect()),
            [hole] => {
                let hole = self.loop_points(*hole);
                if hole.len() != n {
                    return Err(KernelError::UnsupportedFace {
                        reason: format!(
                            "ring face needs matching loops, got {n} outer and {} inner vertices",
                            hole.len()
                        ),
                    });
                }
                let aligned: Vec<Point3d> = (0..n).map(|j| hole[(n - j) % n]).collect();
                let mut tris = Vec::with_capacity(2 * n);
                for j in 0..n {
                    let k = (j + 1) % n;
                    tris.push([outer[j], outer[k], aligned[k]]);
                    tris.push([outer[j], aligned[k], aligned[j]]);
                }
                Ok(tris)
            }
            holes => Err(KernelError::UnsupportedFace {
                reason: format!("{} holes in one face", holes.len()),
            }),
        }
    }

    /// Apply a rigid transform to every vertex and surface of a solid.
    pub fn transform_solid(&mut self, solid_id: SolidId, t: &Transform) {
        for v in self.solid_vertices(solid_id) {
            let p = self.vertices[v].point;
            self.vertices[v].point = t.transform_point(&p);
        }
        for face_id in self.solid_faces(solid_id) {
            let surface = self.faces[face_id].surface.transformed(t);
            self.faces[face_id].surface = surface;
        }
    }
}

// ─── Topology Audit ─────────────────────────────────────────────────────────

/// Result of a topological consistency check.
#[derive(Debug, Clone)]
pub struct TopologyAudit {
    pub counts: TopologyCounts,
    /// Genus derived from the Euler-Poincaré characteristic. `None` if the
    /// characteristic is odd, which no closed orientable shell produces.
    pub genus: Option<i64>,
    /// Every edge has exactly two uses.
    pub all_edges_two_faced: bool,
    /// Every edge is traversed once in each direction.
    pub orientation_consistent: bool,
    pub all_loops_valid: bool,
    pub errors: Vec<TopologyError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// The characteristic does not correspond to a closed orientable surface.
    OddCharacteristic { shell: ShellId, chi: i64 },
    /// Edge used by a single loop.
    OpenEdge { start: VertexId, end: VertexId },
    /// Edge shared by more than two loop traversals.
    NonManifoldEdge { start: VertexId, end: VertexId, uses: usize },
    /// Two adjacent faces traverse the edge in the same direction.
    FlippedEdge { start: VertexId, end: VertexId },
    /// Loop with fewer than three vertices or a repeated consecutive vertex.
    DegenerateLoop { loop_id: LoopId },
}

impl TopologyAudit {
    pub fn all_valid(&self) -> bool {
        self.genus.is_some()
            && self.all_edges_two_faced
            && self.orientation_consistent
            && self.all_loops_valid
    }

    /// Closed, consistently oriented 2-manifold.
    pub fn is_watertight(&self) -> bool {
        self.all_edges_two_faced && self.orientation_consistent
    }
}

/// Perform a full topology audit on a solid.
pub fn audit_solid(store: &EntityStore, solid_id: SolidId) -> TopologyAudit {
    let solid = &store.solids[solid_id];
    let mut errors = Vec::new();
    let mut counts = TopologyCounts::default();
    let mut genus = Some(0);

    for &shell_id in &solid.shells {
        let shell_counts = store.count_topology(shell_id);
        counts.vertices += shell_counts.vertices;
        counts.edges += shell_counts.edges;
        counts.faces += shell_counts.faces;
        counts.rings += shell_counts.rings;

        let chi = shell_counts.euler_poincare();
        if chi % 2 != 0 {
            errors.push(TopologyError::OddCharacteristic { shell: shell_id, chi });
            genus = None;
        } else {
            genus = genus.map(|g| g + 1 - chi / 2);
        }

        let directed = store.directed_edges(shell_id);
        for (&(a, b), &forward) in &directed {
            let backward = directed.get(&(b, a)).copied().unwrap_or(0);
            // Report each undirected edge once.
            if backward > 0 && b < a {
                continue;
            }
            let uses = forward + backward;
            if uses == 1 {
                errors.push(TopologyError::OpenEdge { start: a, end: b });
            } else if uses > 2 {
                errors.push(TopologyError::NonManifoldEdge { start: a, end: b, uses });
            } else if forward != 1 || backward != 1 {
                errors.push(TopologyError::FlippedEdge { start: a, end: b });
            }
        }

        for &face_id in &store.shells[shell_id].faces {
            for loop_id in store.face_loops(face_id) {
                let verts = &store.loops[loop_id].vertices;
                let repeated = verts
                    .iter()
                    .enumerate()
                    .any(|(i, v)| *v == verts[(i + 1) % verts.len()]);
                if verts.len() < 3 || repeated {
                    errors.push(TopologyError::DegenerateLoop { loop_id });
                }
            }
        }
    }

    let has = |pred: fn(&TopologyError) -> bool| errors.iter().any(pred);
    TopologyAudit {
        counts,
        genus,
        all_edges_two_faced: !has(|e| {
            matches!(e, TopologyError::OpenEdge { .. } | TopologyError::NonManifoldEdge { .. })
        }),
        orientation_consistent: !has(|e| matches!(e, TopologyError::FlippedEdge { .. })),
        all_loops_valid: !has(|e| matches!(e, TopologyError::DegenerateLoop { .. })),
        errors,
    }
}
