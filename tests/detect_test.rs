use fiducial_gap::config::{ContourBand, CornerDetectorConfig};
use fiducial_gap::detect::{contour_centroids, detect_contour_features, select_strongest};
use glam::Vec2;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

fn fill_square(mask: &mut GrayImage, x: i32, y: i32, side: u32) {
    draw_filled_rect_mut(mask, Rect::at(x, y).of_size(side, side), Luma([255u8]));
}

#[test]
fn test_selection_caps_at_max_corners() {
    // Twelve well-separated responses, all above the quality floor.
    let responses: Vec<(Vec2, f32)> = (0..12)
        .map(|i| (Vec2::new(i as f32 * 40.0, 10.0), 100.0 - i as f32))
        .collect();
    let cfg = CornerDetectorConfig::default();
    let selected = select_strongest(&responses, &cfg);
    assert_eq!(selected.len(), cfg.max_corners);
    // Strongest first.
    assert_eq!(selected[0], Vec2::new(0.0, 10.0));
}

#[test]
fn test_selection_enforces_quality_floor() {
    let responses = vec![
        (Vec2::new(10.0, 10.0), 1000.0),
        (Vec2::new(100.0, 10.0), 500.0),
        // Below 1% of the strongest response.
        (Vec2::new(200.0, 10.0), 5.0),
    ];
    let selected = select_strongest(&responses, &CornerDetectorConfig::default());
    assert_eq!(selected.len(), 2);
}

#[test]
fn test_selection_suppresses_close_neighbors() {
    let responses = vec![
        (Vec2::new(50.0, 50.0), 900.0),
        // 5 px from the strongest: suppressed by the 12 px separation.
        (Vec2::new(55.0, 50.0), 800.0),
        (Vec2::new(120.0, 50.0), 700.0),
    ];
    let selected = select_strongest(&responses, &CornerDetectorConfig::default());
    assert_eq!(selected, vec![Vec2::new(50.0, 50.0), Vec2::new(120.0, 50.0)]);
}

#[test]
fn test_selection_of_empty_response_set() {
    let selected = select_strongest(&[], &CornerDetectorConfig::default());
    assert!(selected.is_empty());
}

#[test]
fn test_contour_centroid_of_mark() {
    let mut mask = GrayImage::new(64, 64);
    // 7x7 mark: traced boundary encloses 36 px^2, inside the band.
    fill_square(&mut mask, 10, 20, 7);
    let features = detect_contour_features(&mask, &ContourBand::default());
    assert_eq!(features.len(), 1);
    assert!((features[0].area - 36.0).abs() < 1e-6);
    let c = features[0].centroid;
    assert!((c.x - 13.0).abs() < 0.5);
    assert!((c.y - 23.0).abs() < 0.5);
}

#[test]
fn test_contour_area_band_rejects_noise_and_blobs() {
    let mut mask = GrayImage::new(128, 128);
    fill_square(&mut mask, 5, 5, 3); // 4 px^2: sensor speckle
    fill_square(&mut mask, 40, 40, 7); // in band
    fill_square(&mut mask, 80, 80, 12); // 121 px^2: too large
    let features = detect_contour_features(&mask, &ContourBand::default());
    assert_eq!(features.len(), 1);
    let c = features[0].centroid;
    assert!((c.x - 43.0).abs() < 0.5);
    assert!((c.y - 43.0).abs() < 0.5);
}

#[test]
fn test_empty_mask_yields_empty_set() {
    let mask = GrayImage::new(32, 32);
    let features = detect_contour_features(&mask, &ContourBand::default());
    assert!(features.is_empty());
    assert!(contour_centroids(&features).is_empty());
}

#[test]
fn test_two_marks_two_centroids() {
    let mut mask = GrayImage::new(256, 256);
    fill_square(&mut mask, 60, 20, 7);
    fill_square(&mut mask, 64, 230, 7);
    let centroids = contour_centroids(&detect_contour_features(&mask, &ContourBand::default()));
    assert_eq!(centroids.len(), 2);
    let mut xs: Vec<f32> = centroids.iter().map(|c| c.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((xs[0] - 63.0).abs() < 0.5);
    assert!((xs[1] - 67.0).abs() < 0.5);
}
