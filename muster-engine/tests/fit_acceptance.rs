use muster_engine::{ReferenceTable, SIZE_COLUMN, ScalingModel};

const KNOT_TOLERANCE: f64 = 1e-6;

fn builtin_model() -> ScalingModel {
    ScalingModel::fit(&ReferenceTable::builtin(), SIZE_COLUMN).expect("builtin table fits")
}

fn canonical_hp_table() -> ReferenceTable {
    ReferenceTable::from_series(vec![
        ("num_units", vec![10, 50, 100, 500, 1000, 2000]),
        ("hp_adjust", vec![0, 20, 45, 250, 520, 1100]),
    ])
    .expect("canonical series are well formed")
}

#[test]
fn every_channel_reproduces_its_recorded_knots() {
    let model = builtin_model();
    let channels: Vec<String> = model.channels().map(ToString::to_string).collect();
    assert_eq!(channels.len(), 4, "builtin table carries four channels");
    for channel in &channels {
        for (x, y) in model.knots(channel).expect("channel was just listed") {
            let got = model.evaluate(channel, x).expect("channel was just listed");
            assert!(
                (got - y).abs() < KNOT_TOLERANCE,
                "{channel} at {x}: got {got}, recorded {y}"
            );
        }
    }
}

#[test]
fn canonical_hp_curve_matches_the_documented_values() {
    let model = ScalingModel::fit(&canonical_hp_table(), "num_units").expect("table fits");
    let at_100 = model.evaluate("hp_adjust", 100.0).expect("known channel");
    let at_2000 = model.evaluate("hp_adjust", 2000.0).expect("known channel");
    assert!((at_100 - 45.0).abs() < KNOT_TOLERANCE, "eval(100) = {at_100}");
    assert!(
        (at_2000 - 1100.0).abs() < KNOT_TOLERANCE,
        "eval(2000) = {at_2000}"
    );
}

#[test]
fn refitting_never_changes_an_evaluation() {
    let first = ScalingModel::fit(&canonical_hp_table(), "num_units").expect("table fits");
    let second = ScalingModel::fit(&canonical_hp_table(), "num_units").expect("table fits");
    for x in [10.0, 33.0, 100.0, 640.5, 2000.0, 2500.0, 10_000.0] {
        let a = first.evaluate("hp_adjust", x).expect("known channel");
        let b = second.evaluate("hp_adjust", x).expect("known channel");
        assert_eq!(a.to_bits(), b.to_bits(), "refit diverged at {x}");
    }
}

#[test]
fn extrapolation_extends_the_boundary_segments() {
    let model = ScalingModel::fit(&canonical_hp_table(), "num_units").expect("table fits");
    let inside = model.evaluate("hp_adjust", 300.0).expect("known channel");
    assert!(
        (inside - 146.328_101_085).abs() < 1e-6,
        "mid-domain value drifted: {inside}"
    );

    let above = model.evaluate("hp_adjust", 2500.0).expect("known channel");
    let far_above = model.evaluate("hp_adjust", 4000.0).expect("known channel");
    assert!(
        (above - 1394.381_930_036).abs() < 1e-6,
        "extrapolated value drifted: {above}"
    );
    assert!(
        far_above > above && above > 1100.0,
        "hp curve should keep climbing past the table ({above} then {far_above})"
    );

    let below = model.evaluate("hp_adjust", 5.0).expect("known channel");
    assert!(
        (below + 2.500_527_326).abs() < 1e-6,
        "below-domain extrapolation is unclamped ({below})"
    );
}

#[test]
fn linear_channels_are_reproduced_exactly() {
    let sizes = vec![10, 50, 100, 500, 1000];
    let values: Vec<i64> = sizes.iter().map(|s| 2 * s + 7).collect();
    let table = ReferenceTable::from_series(vec![
        ("num_units", sizes),
        ("drill_adjust", values),
    ])
    .expect("series are well formed");
    let model = ScalingModel::fit(&table, "num_units").expect("table fits");
    let mid = model.evaluate("drill_adjust", 250.0).expect("known channel");
    let outside = model.evaluate("drill_adjust", 5000.0).expect("known channel");
    assert!((mid - 507.0).abs() < KNOT_TOLERANCE, "eval(250) = {mid}");
    assert!(
        (outside - 10_007.0).abs() < 1e-6,
        "linear data must extrapolate linearly, got {outside}"
    );
}

#[test]
fn model_domain_and_labels_come_from_the_table() {
    let model = builtin_model();
    let (lo, hi) = model.domain();
    assert!((lo - 10.0).abs() < KNOT_TOLERANCE);
    assert!((hi - 2000.0).abs() < KNOT_TOLERANCE);
    assert_eq!(model.size_label(1000.0), Some("Brigade"));
    let samples = model
        .sample_curve("hp_adjust", 25)
        .expect("builtin hp channel exists");
    assert_eq!(samples.len(), 25);
    assert!(samples.windows(2).all(|pair| pair[0].0 < pair[1].0));
}
