use fiducial_gap::config::PairBand;
use fiducial_gap::pairing::{midpoint, pair_scan};
use fiducial_gap::types::{MeasureState, Measurement};
use glam::Vec2;

#[test]
fn test_single_pair_accepted_and_updates() {
    // Two marks, 8 px apart in x and 220 px apart in y.
    let pts = vec![Vec2::new(100.0, 100.0), Vec2::new(108.0, 320.0)];
    let mut state = MeasureState::new();
    let accepted = pair_scan(&pts, &PairBand::default(), 2.75, &mut state);

    // Ordered scan accepts both directions of the same physical pair.
    assert_eq!(accepted.len(), 2);
    for pair in &accepted {
        assert_eq!(pair.midpoint, Vec2::new(104.0, 210.0));
    }
    // Both accumulated midpoints coincide, so the update is a zero
    // displacement, but it is an update, not a carry-forward.
    assert!(state.measurement.is_some());
    assert_eq!(state.frames_since_update, 0);
    let m = state.measurement.unwrap();
    assert!(m.abs_x_um() < 1e-6);
    assert!(m.abs_y_um() < 1e-6);
}

#[test]
fn test_out_of_band_pair_keeps_previous_measurement() {
    let mut state = MeasureState::new();
    state.update(Measurement::new(220.0, 41.25));

    // y distance of 300 px falls outside the separation band.
    let pts = vec![Vec2::new(100.0, 100.0), Vec2::new(200.0, 400.0)];
    let accepted = pair_scan(&pts, &PairBand::default(), 2.75, &mut state);

    assert!(accepted.is_empty());
    assert_eq!(state.measurement, Some(Measurement::new(220.0, 41.25)));
    assert_eq!(state.frames_since_update, 1);
}

#[test]
fn test_fewer_than_two_points_never_update() {
    let band = PairBand::default();
    for pts in [vec![], vec![Vec2::new(50.0, 50.0)]] {
        let mut state = MeasureState::new();
        let accepted = pair_scan(&pts, &band, 2.75, &mut state);
        assert!(accepted.is_empty());
        assert!(state.measurement.is_none());
        assert_eq!(state.frames_since_update, 1);
    }
}

#[test]
fn test_only_band_qualifying_pairs_contribute() {
    // One valid pair plus an outlier that pairs with nothing.
    let pts = vec![
        Vec2::new(100.0, 100.0),
        Vec2::new(108.0, 320.0),
        Vec2::new(500.0, 10.0),
    ];
    let mut state = MeasureState::new();
    let accepted = pair_scan(&pts, &PairBand::default(), 2.75, &mut state);

    assert_eq!(accepted.len(), 2);
    let band = PairBand::default();
    for pair in &accepted {
        let xd = (pair.a.x - pair.b.x).abs();
        let yd = (pair.a.y - pair.b.y).abs();
        assert!(band.accepts(xd, yd));
        // The outlier never appears in an accepted pair.
        assert!(pair.a != pts[2] && pair.b != pts[2]);
    }
}

#[test]
fn test_two_mark_pairs_measure_between_midpoints() {
    // Four marks forming two vertical pairs: the measurement is the
    // displacement between the pair midpoints. Candidate order
    // interleaves the pairs, as a detector sorted by response would.
    let pts = vec![
        Vec2::new(100.0, 100.0), // left top
        Vec2::new(300.0, 105.0), // right top
        Vec2::new(104.0, 310.0), // left bottom
        Vec2::new(303.0, 312.0), // right bottom
    ];
    let mut state = MeasureState::new();
    let accepted = pair_scan(&pts, &PairBand::default(), 2.75, &mut state);

    // Each physical pair is accepted in both directions.
    assert_eq!(accepted.len(), 4);
    let m = state.measurement.unwrap();
    // Midpoints: left (102, 205), right (301.5, 208.5).
    assert!((m.x_difference_um - (102.0 - 301.5) * 2.75).abs() < 1e-3);
    assert!((m.y_difference_um - (205.0 - 208.5) * 2.75).abs() < 1e-3);
    assert!((m.abs_x_um() - 548.625).abs() < 1e-3);
}

#[test]
fn test_midpoint_commutative() {
    let a = Vec2::new(100.0, 100.0);
    let b = Vec2::new(108.0, 320.0);
    assert_eq!(midpoint(a, b), midpoint(b, a));
}

#[test]
fn test_scale_factor_is_linear() {
    let pts = vec![
        Vec2::new(100.0, 100.0),
        Vec2::new(300.0, 105.0),
        Vec2::new(104.0, 310.0),
        Vec2::new(303.0, 312.0),
    ];
    let band = PairBand::default();

    let mut s1 = MeasureState::new();
    pair_scan(&pts, &band, 1.0, &mut s1);
    let mut s2 = MeasureState::new();
    pair_scan(&pts, &band, 2.0, &mut s2);

    let m1 = s1.measurement.unwrap();
    let m2 = s2.measurement.unwrap();
    assert!((m2.x_difference_um - 2.0 * m1.x_difference_um).abs() < 1e-3);
    assert!((m2.y_difference_um - 2.0 * m1.y_difference_um).abs() < 1e-3);
}

#[test]
fn test_band_edges() {
    let band = PairBand::default();
    // Exactly on the x tolerance: accepted.
    assert!(band.accepts(8.0, 210.0));
    assert!(!band.accepts(8.5, 210.0));
    // Self-pair distance.
    assert!(!band.accepts(0.0, 210.0));
    // Lower y edge is exclusive, upper inclusive.
    assert!(!band.accepts(4.0, 200.0));
    assert!(band.accepts(4.0, 223.0));
    assert!(!band.accepts(4.0, 223.5));
}
