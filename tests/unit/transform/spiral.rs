use super::*;

fn concentric() -> EffectParameters {
    EffectParameters {
        spin: 0,
        radius: 400.0,
        ratio: 0.5,
        min_depth: -2,
        max_depth: 2,
        ..EffectParameters::default()
    }
}

fn close(a: Point, b: Point, eps: f64) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
}

#[test]
fn period_is_log_of_inverse_ratio() {
    let s = SpiralTransform::new(&concentric());
    assert!((s.period() - 2f64.ln()).abs() < 1e-15);
}

#[test]
fn depth_zero_lands_in_the_outer_annulus_without_spin() {
    let s = SpiralTransform::new(&concentric());
    for t in [
        Point::new(3.0, 4.0),
        Point::new(-250.0, 10.0),
        Point::new(1000.0, -999.0),
        Point::new(1.5, 0.0),
    ] {
        let c = s.source_point(t, 0);
        let r = c.to_vec2().hypot();
        assert!((200.0 - 1e-9..400.0 + 1e-9).contains(&r), "{t:?} -> {c:?} (r={r})");
        // no spin: the direction is preserved
        let cross = t.x * c.y - t.y * c.x;
        assert!(cross.abs() <= 1e-9 * r * t.to_vec2().hypot(), "{t:?} -> {c:?}");
        assert!(t.x * c.x + t.y * c.y > 0.0);
    }

    // inside the unit circle the remainder is negative, so the copy sits one step inward
    let c = s.source_point(Point::new(0.01, 0.02), 0);
    let r = c.to_vec2().hypot();
    assert!((100.0 - 1e-9..=200.0 + 1e-9).contains(&r), "{c:?} (r={r})");
}

#[test]
fn each_depth_scales_by_inverse_ratio() {
    for spin in [-2, 0, 1, 3] {
        let s = SpiralTransform::new(&EffectParameters {
            spin,
            ..concentric()
        });
        let t = Point::new(37.0, -12.5);
        let c0 = s.source_point(t, 0).to_vec2();
        let c1 = s.source_point(t, 1).to_vec2();
        let cm1 = s.source_point(t, -1).to_vec2();
        assert!((c1 - c0 * 2.0).hypot() < 1e-9, "spin {spin}");
        assert!((cm1 - c0 * 0.5).hypot() < 1e-9, "spin {spin}");
    }
}

#[test]
fn center_translates_the_result() {
    let base = concentric();
    let moved = EffectParameters {
        center: Point::new(10.0, -20.0),
        ..base
    };
    let t = Point::new(55.0, 66.0);
    let a = SpiralTransform::new(&base).source_point(t, 1);
    let b = SpiralTransform::new(&moved).source_point(t, 1);
    assert!(close(b, a + kurbo::Vec2::new(10.0, -20.0), 1e-9));
}

#[test]
fn position_moves_the_vanishing_point() {
    let p = EffectParameters {
        position: Point::new(30.0, 40.0),
        ..EffectParameters::default()
    };
    let s = SpiralTransform::new(&p);
    let c = s.source_point(Point::new(30.0, 40.0), 0);
    assert!(!c.x.is_finite() || !c.y.is_finite(), "{c:?}");

    let shifted = s.source_point(Point::new(33.0, 44.0), 0);
    let origin = SpiralTransform::new(&EffectParameters::default())
        .source_point(Point::new(3.0, 4.0), 0);
    assert!(close(shifted, origin, 1e-9));
}

#[test]
fn whole_turns_of_rotation_and_evolution_are_ignored() {
    let t = Point::new(-80.0, 15.0);
    let base = EffectParameters::default();
    let reference = SpiralTransform::new(&EffectParameters {
        rotation: 0.25,
        evolution: 0.5,
        ..base
    })
    .source_point(t, 0);
    let wrapped = SpiralTransform::new(&EffectParameters {
        rotation: 3.25,
        evolution: 2.5,
        ..base
    })
    .source_point(t, 0);
    assert!(close(reference, wrapped, 1e-6), "{reference:?} vs {wrapped:?}");
}

#[test]
fn quarter_rotation_turns_the_source_without_spin() {
    let s = SpiralTransform::new(&EffectParameters {
        rotation: 0.25,
        ..concentric()
    });
    let c = s.source_point(Point::new(0.0, 300.0), 0);
    assert!(c.x > 0.0);
    assert!(c.y.abs() < 1e-9, "{c:?}");
}

#[test]
fn on_back_mirrors_the_depth_range() {
    let front = EffectParameters {
        min_depth: -1,
        max_depth: 2,
        ..EffectParameters::default()
    };
    let back = EffectParameters {
        layering: Layering::OnBack,
        ..front
    };
    let f = SpiralTransform::new(&front);
    let b = SpiralTransform::new(&back);
    let t = Point::new(12.0, 9.0);
    for d in -1..=2 {
        assert_eq!(b.effective_depth(d), 1 - d);
        assert_eq!(b.source_point(t, d), f.source_point(t, 1 - d));
    }
}
