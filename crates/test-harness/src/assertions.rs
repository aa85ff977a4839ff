//! Assertion helpers with diagnostic output.
//!
//! Every failure names the context it was raised in and reports expected
//! against actual values.

use configurator::validate::THICKNESS_MARGIN_MM;
use configurator::{PipeMesh, PricingRules};
use pipe_tessellation::TriangleMesh;
use pipe_types::PipeConfiguration;

use crate::helpers::{mesh_bounding_box, mesh_vertex_centroid, HarnessError};

/// Assert the standard-rules price of a configuration, to the cent.
pub fn assert_price(
    config: &PipeConfiguration,
    expected: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let quote = PricingRules::STANDARD.quote(config);
    if (quote.total - expected).abs() < 0.005 {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] price of D={} t={} L={} {}: expected {:.2}, got {:.2} (mass {:.3} kg, x{})",
                ctx,
                config.outer_diameter,
                config.wall_thickness,
                config.length,
                config.color.as_str(),
                expected,
                quote.total,
                quote.mass_kg,
                quote.multiplier,
            ),
        })
    }
}

/// Assert the mesh bounding box matches expected values within tolerance.
pub fn assert_bounding_box(
    mesh: &TriangleMesh,
    expected_min: [f32; 3],
    expected_max: [f32; 3],
    tol: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    if mesh.is_empty() {
        return Err(HarnessError::NoMesh {
            ctx: format!("[{}] bounding box of an empty mesh", ctx),
        });
    }
    let (actual_min, actual_max) = mesh_bounding_box(mesh);

    for i in 0..3 {
        if (actual_min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.4}, got {:.4} (tol={})",
                    ctx, i, expected_min[i], actual_min[i], tol,
                ),
            });
        }
        if (actual_max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.4}, got {:.4} (tol={})",
                    ctx, i, expected_max[i], actual_max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert that the mesh, welded by position, is a closed and consistently
/// oriented 2-manifold.
pub fn assert_closed_manifold(mesh: &TriangleMesh, ctx: &str) -> Result<(), HarnessError> {
    let report = mesh.edge_report();
    if report.is_closed_manifold() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] mesh is not a closed manifold: {} boundary, {} non-manifold, {} inconsistent of {} edges",
                ctx, report.boundary, report.non_manifold, report.inconsistent, report.edges,
            ),
        })
    }
}

/// The render mesh stores f32 positions.
const MESH_TOL: f64 = 1e-6;

/// Assert that the pipe solid sits on the origin: its centroid and the
/// middle of its bounding box both within `tol` of zero, and the render
/// mesh vertices averaging to the origin within f32 precision.
pub fn assert_centered(pipe: &PipeMesh, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    let c = pipe.centroid_offset;
    let centroid = [c.x, c.y, c.z];
    let (min, max) = (pipe.bounding_box.min, pipe.bounding_box.max);
    let middle = [
        (min.x + max.x) / 2.0,
        (min.y + max.y) / 2.0,
        (min.z + max.z) / 2.0,
    ];

    for i in 0..3 {
        if centroid[i].abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] centroid[{}] is {:.3e}, expected 0 (tol={})",
                    ctx, i, centroid[i], tol,
                ),
            });
        }
        if middle[i].abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box middle[{}] is {:.3e}, expected 0 (tol={})",
                    ctx, i, middle[i], tol,
                ),
            });
        }
    }

    let vertex_mean = mesh_vertex_centroid(&pipe.mesh);
    for (i, m) in vertex_mean.iter().enumerate() {
        if m.abs() > MESH_TOL {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] mesh vertex mean[{}] is {:.3e}, expected 0 (tol={})",
                    ctx, i, m, MESH_TOL,
                ),
            });
        }
    }
    Ok(())
}

/// Assert that a configuration keeps an open bore and stays inside the
/// allowed thickness limit for its diameter.
pub fn assert_valid_wall(config: &PipeConfiguration, ctx: &str) -> Result<(), HarnessError> {
    if !config.has_open_bore() {
        return Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] wall {} closes the bore of a {} mm pipe",
                ctx, config.wall_thickness, config.outer_diameter,
            ),
        });
    }
    let max_allowed = config.outer_radius() - THICKNESS_MARGIN_MM;
    if config.wall_thickness > max_allowed {
        return Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] wall {} exceeds the {} mm limit of a {} mm pipe",
                ctx, config.wall_thickness, max_allowed, config.outer_diameter,
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{custom_pipe, pipe};
    use configurator::build_mesh;

    #[test]
    fn default_pipe_prices_at_70_93() {
        assert_price(&pipe(200.0, 8.0, 3000.0), 70.93, "default").unwrap();
    }

    #[test]
    fn wrong_price_reports_context() {
        let err = assert_price(&custom_pipe(200.0, 8.0, 3000.0, "#000001"), 70.93, "custom")
            .unwrap_err()
            .to_string();
        assert!(err.contains("[custom]"), "{err}");
        assert!(err.contains("106.40"), "{err}");
    }

    #[test]
    fn default_mesh_is_closed_and_centered() {
        let built = build_mesh(&pipe(200.0, 8.0, 3000.0)).unwrap();
        assert_closed_manifold(&built.mesh, "default").unwrap();
        assert_centered(&built, 1e-9, "default").unwrap();
        assert_bounding_box(
            &built.mesh,
            [-0.1, -0.1, -1.5],
            [0.1, 0.1, 1.5],
            1e-4,
            "default",
        )
        .unwrap();
    }

    #[test]
    fn empty_mesh_has_no_bounding_box() {
        let err = assert_bounding_box(&TriangleMesh::new(), [0.0; 3], [0.0; 3], 0.1, "empty");
        assert!(matches!(err, Err(HarnessError::NoMesh { .. })));
    }

    #[test]
    fn wall_limits_are_flagged() {
        assert!(assert_valid_wall(&pipe(20.0, 10.0, 1000.0), "closed").is_err());
        assert!(assert_valid_wall(&pipe(20.0, 9.0, 1000.0), "at limit").is_ok());
        let err = assert_valid_wall(&pipe(20.0, 9.5, 1000.0), "over limit").unwrap_err();
        assert!(err.to_string().contains("exceeds the 9 mm limit"), "{err}");
    }
}
