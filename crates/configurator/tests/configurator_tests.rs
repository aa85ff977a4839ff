//! Invariants of the validator, pricing engine and generator over random input.

use configurator::*;
use pipe_tessellation::TriangleMesh;
use pipe_types::*;
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────────

fn arb_field() -> impl Strategy<Value = Field> {
    prop::sample::select(Field::ALL.to_vec())
}

/// Raw values a front end can produce: slider numbers, typed text, garbage, colors.
fn arb_raw_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        (-50.0f64..400.0).prop_map(RawValue::Number),
        (0u32..7000).prop_map(|n| RawValue::Text(n.to_string())),
        "[a-z#0-9]{0,8}".prop_map(RawValue::Text),
        prop::sample::select(StandardFinish::ALL.to_vec()).prop_map(|f| RawValue::from(f.hex())),
    ]
}

/// Configurations the sliders can reach directly.
fn arb_slider_config() -> impl Strategy<Value = PipeConfiguration> {
    let d = FieldBounds::OUTER_DIAMETER;
    let t = FieldBounds::WALL_THICKNESS;
    let l = FieldBounds::LENGTH;
    (
        0..d.positions(),
        0..t.positions(),
        0..l.positions(),
        prop::sample::select(StandardFinish::ALL.to_vec()),
    )
        .prop_filter_map("wall must leave a bore", move |(di, ti, li, finish)| {
            let config = PipeConfiguration::new(
                d.value_at(di),
                t.value_at(ti),
                l.value_at(li),
                finish.into(),
            );
            (config.wall_thickness <= config.outer_radius() - 1.0).then_some(config)
        })
}

// ── Validator ────────────────────────────────────────────────────────────

proptest! {
    /// Whatever sequence of edits is applied, a nonzero price implies a bore.
    #[test]
    fn reachable_configurations_keep_a_bore(
        edits in prop::collection::vec((arb_field(), arb_raw_value()), 0..40),
    ) {
        let mut config = PipeConfiguration::default();
        for (field, raw) in &edits {
            config = update_field(&config, *field, raw);
            if price(&config) != 0.0 {
                prop_assert!(config.wall_thickness < config.outer_diameter / 2.0,
                    "{config:?} priced without a bore");
            }
        }
    }

    /// Refused edits never change anything; accepted ones only touch the edited
    /// field, plus the wall thickness for a diameter edit.
    #[test]
    fn edits_touch_only_their_field(
        config in arb_slider_config(),
        field in arb_field(),
        raw in arb_raw_value(),
    ) {
        match try_update_field(&config, field, &raw) {
            Err(_) => prop_assert_eq!(update_field(&config, field, &raw), config),
            Ok(update) => {
                let next = update.config;
                if field != Field::OuterDiameter {
                    prop_assert!(!update.auto_corrected);
                    prop_assert_eq!(next.outer_diameter, config.outer_diameter);
                }
                if field != Field::WallThickness && !update.auto_corrected {
                    prop_assert_eq!(next.wall_thickness, config.wall_thickness);
                }
                if field != Field::Length {
                    prop_assert_eq!(next.length, config.length);
                }
                if field != Field::Color {
                    prop_assert_eq!(&next.color, &config.color);
                }
            }
        }
    }

    /// Slider values for the thickness are accepted exactly when they stay
    /// one millimeter clear of the axis.
    #[test]
    fn thickness_limit_is_a_hard_stop(config in arb_slider_config(), ti in 0usize..27) {
        let requested = FieldBounds::WALL_THICKNESS.value_at(ti);
        let result = try_update_field(&config, Field::WallThickness, &RawValue::from(requested));
        if requested > config.outer_radius() - 1.0 {
            let rejected = matches!(result, Err(InvalidFieldUpdate::ThicknessExceedsLimit { .. }));
            prop_assert!(rejected);
        } else {
            prop_assert_eq!(result.unwrap().config.wall_thickness, requested);
        }
    }
}

// ── Pricing ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn price_strictly_increases_with_length(
        config in arb_slider_config(),
        extra in 100.0f64..3000.0,
    ) {
        let longer = PipeConfiguration { length: config.length + extra, ..config.clone() };
        prop_assert!(price(&longer) > price(&config));
    }

    #[test]
    fn price_does_not_decrease_with_diameter(
        config in arb_slider_config(),
        extra in 0.0f64..100.0,
    ) {
        let wider = PipeConfiguration {
            outer_diameter: config.outer_diameter + extra,
            ..config.clone()
        };
        prop_assert!(price(&wider) >= price(&config));
    }

    #[test]
    fn custom_colors_cost_one_and_a_half(config in arb_slider_config(), hex in "#[0-9a-f]{6}") {
        let custom = PipeConfiguration { color: FinishColor::new(hex.clone()), ..config.clone() };
        let expected = if StandardFinish::from_hex(&hex).is_some() { None } else { Some(1.5) };
        if let Some(m) = expected {
            prop_assert_eq!(pricing::multiplier(&custom.color), m);
            let base = PricingRules::STANDARD.quote(&custom).base_price;
            prop_assert_eq!(price(&custom), pricing::round_cents(base * m));
        }
    }

    #[test]
    fn degenerate_walls_are_free(d in 1.0f64..300.0, excess in 0.0f64..50.0, len in 500.0f64..6000.0) {
        let config = PipeConfiguration::new(d, d / 2.0 + excess, len, FinishColor::default());
        prop_assert_eq!(price(&config), 0.0);
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────

fn assert_closed(mesh: &TriangleMesh) -> Result<(), TestCaseError> {
    let report = mesh.edge_report();
    prop_assert!(report.is_closed_manifold(), "{report:?}");
    prop_assert!(mesh.signed_volume() > 0.0);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_slider_configuration_builds_a_closed_centered_tube(config in arb_slider_config()) {
        let pipe = build_mesh(&config).unwrap();
        assert_closed(&pipe.mesh)?;

        let c = pipe.centroid_offset;
        prop_assert!(c.x.abs() < 1e-9 && c.y.abs() < 1e-9 && c.z.abs() < 1e-9, "{c:?}");

        let size = pipe.bounding_box.size();
        prop_assert!((size.x - config.outer_diameter / 1000.0).abs() < 1e-9);
        prop_assert!((size.z - config.length / 1000.0).abs() < 1e-9);
        prop_assert_eq!(pipe.topology.euler_poincare(), 0);
    }

    #[test]
    fn rebuilding_is_deterministic(config in arb_slider_config()) {
        let a = build_mesh(&config).unwrap();
        let b = build_mesh(&config).unwrap();
        prop_assert_eq!(a.bounding_box, b.bounding_box);
        prop_assert_eq!(a.mesh, b.mesh);
    }
}

// ── Known values ─────────────────────────────────────────────────────────

#[test]
fn default_configuration_costs_70_93() {
    assert_eq!(price(&PipeConfiguration::default()), 70.93);
}

#[test]
fn oversize_thickness_from_defaults_is_ignored() {
    let config = PipeConfiguration::default();
    assert_eq!(update_field(&config, Field::WallThickness, &RawValue::from(100.0)), config);
}

#[test]
fn small_diameter_from_defaults_is_corrected() {
    let next = update_field(&PipeConfiguration::default(), Field::OuterDiameter, &RawValue::from(10.0));
    assert_eq!((next.outer_diameter, next.wall_thickness), (10.0, 3.0));
}

#[test]
fn uppercase_gray_is_custom() {
    assert_eq!(pricing::multiplier(&FinishColor::new("#71717A")), 1.5);
    assert_eq!(pricing::multiplier(&FinishColor::new("#71717a")), 1.0);
}

#[test]
fn corrected_small_pipes_keep_their_formula_price() {
    let defaults = PipeConfiguration::default();

    let next = update_field(&defaults, Field::OuterDiameter, &RawValue::from(10.0));
    assert_eq!(price(&next), 0.97);

    // Thickness equal to the radius: 2t >= D, nothing to sell.
    let next = update_field(&defaults, Field::OuterDiameter, &RawValue::from(4.0));
    assert_eq!(next.wall_thickness, 0.0);
    assert_eq!(price(&next), 0.0);

    // Thickness -1 passes the guard and the bore is wider than the pipe.
    let next = update_field(&defaults, Field::OuterDiameter, &RawValue::from(2.0));
    assert_eq!(next.wall_thickness, -1.0);
    assert_eq!(price(&next), -0.14);
}

#[test]
fn negative_thickness_edit_prices_below_zero() {
    let next = update_field(&PipeConfiguration::default(), Field::WallThickness, &RawValue::from(-5.0));
    assert_eq!(next.wall_thickness, -5.0);
    assert_eq!(price(&next), -47.34);
    assert_eq!(PricingRules::STANDARD.quote(&next).total, -47.34);
}
