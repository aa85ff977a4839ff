use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use pipe_kernel::geometry::point::Point3d;
use pipe_kernel::geometry::transform::{BoundingBox, Transform};
use pipe_kernel::topology::brep::TopologyCounts;
use pipe_kernel::{
    AnnularProfile, EntityStore, ExtrudeOptions, extrude_annulus, mass_properties, verify_topology,
};
use pipe_tessellation::{TriangleMesh, tessellate_solid};
use pipe_types::{FinishColor, PipeConfiguration};

use crate::error::GeneratorError;
use crate::settings::MeshSettings;

/// Surface appearance of the pipe. Color never affects the solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    pub base_color: FinishColor,
    /// sRGB channels of `base_color` in [0, 1]. Strings that are not hex
    /// colors render as the default gray.
    pub rgb: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
}

impl MaterialDescription {
    pub const ROUGHNESS: f32 = 0.3;
    pub const METALNESS: f32 = 0.1;

    pub fn for_color(color: &FinishColor) -> Self {
        let channels = color
            .to_rgb()
            .or_else(|| FinishColor::default().to_rgb())
            .unwrap_or([0; 3]);
        Self {
            base_color: color.clone(),
            rgb: channels.map(|c| f32::from(c) / 255.0),
            roughness: Self::ROUGHNESS,
            metalness: Self::METALNESS,
        }
    }
}

/// Render-ready description of the pipe solid, in scene units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeMesh {
    pub mesh: TriangleMesh,
    pub bounding_box: BoundingBox,
    /// Enclosed volume in scene units cubed.
    pub volume: f64,
    /// Centroid of the solid after recentering; zero up to rounding.
    pub centroid_offset: Point3d,
    pub topology: TopologyCounts,
    /// Chamfer actually applied, in scene units.
    pub chamfer: f64,
    pub material: MaterialDescription,
}

/// Build the pipe solid for a configuration with default settings.
pub fn build_mesh(config: &PipeConfiguration) -> Result<PipeMesh, GeneratorError> {
    build_mesh_with(config, &MeshSettings::default())
}

/// Build the pipe solid: extrude the annular section along Z, recenter it
/// on its centroid and tessellate it. Depends only on the dimensions; the
/// color is passed through to the material.
#[instrument(skip(config, settings), fields(
    outer_diameter = config.outer_diameter,
    wall_thickness = config.wall_thickness,
    length = config.length,
))]
pub fn build_mesh_with(
    config: &PipeConfiguration,
    settings: &MeshSettings,
) -> Result<PipeMesh, GeneratorError> {
    settings.validate()?;

    let dims = [config.outer_diameter, config.wall_thickness, config.length];
    if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) || config.inner_radius() <= 0.0 {
        return Err(GeneratorError::DegenerateGeometry {
            outer_diameter: config.outer_diameter,
            wall_thickness: config.wall_thickness,
            length: config.length,
        });
    }

    let scale = settings.unit_scale;
    let chamfer_mm = settings
        .chamfer_mm
        .min(config.wall_thickness / 4.0)
        .min(config.length / 4.0);
    let chamfer = chamfer_mm * scale;

    let mut store = EntityStore::new();
    let profile = AnnularProfile::new(
        config.outer_radius() * scale,
        config.inner_radius() * scale,
        settings.segments,
    )?;
    let solid = extrude_annulus(
        &mut store,
        &profile,
        &ExtrudeOptions {
            length: config.length * scale,
            chamfer,
        },
    )?;

    let audit = verify_topology(&store, solid);
    if !audit.all_valid() {
        return Err(GeneratorError::InvalidTopology {
            error_count: audit.errors.len(),
        });
    }

    let centroid = mass_properties(&store, solid)?.centroid;
    store.transform_solid(solid, &Transform::from_translation_vec(-centroid.to_vec3()));
    let props = mass_properties(&store, solid)?;

    let mesh = tessellate_solid(&store, solid)?;
    let bounding_box = store.solid_bounding_box(solid);

    info!(
        triangles = mesh.triangle_count(),
        volume = props.volume,
        chamfer,
        "pipe mesh built"
    );

    Ok(PipeMesh {
        mesh,
        bounding_box,
        volume: props.volume,
        centroid_offset: props.centroid,
        topology: audit.counts,
        chamfer,
        material: MaterialDescription::for_color(&config.color),
    })
}
