use super::drag::clip_to_visible;
use super::*;
use approx::assert_relative_eq;

/// x: 1 Pixel = 1 Einheit, y: 1.0 = 100 Pixel
fn view() -> ChartView {
    ChartView::new([0.0, 100.0], [0.0, 1.0], 100, 101)
}

fn curve_with_middle_anchor(view: &ChartView) -> BezierCurve {
    let mut curve = BezierCurve::new(view, Rgb::BLACK);
    curve.add_point(view, IVec2::new(50, 0));
    curve
}

fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

// ── Struktur ──

#[test]
fn test_reset_single_segment() {
    let curve = BezierCurve::new(&view(), Rgb::BLACK);
    let xs: Vec<f64> = curve.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 12.5, 87.5, 100.0]);
    assert!(curve.points().iter().all(|p| p.y == 0.0));
    assert_eq!(curve.name(), "Bezier (2 points)");
}

#[test]
fn test_add_point_inserts_triple() {
    let view = view();
    let mut curve = BezierCurve::new(&view, Rgb::BLACK);
    let anchor = curve.add_point(&view, IVec2::new(50, 0));
    assert_eq!(anchor, Some(3));
    assert_eq!(curve.num_points(), 7);
    let points = curve.points();
    assert_relative_eq!(points[2].x, 37.5);
    assert_relative_eq!(points[3].x, 50.0);
    assert_relative_eq!(points[4].x, 62.5);
    assert_eq!(curve.selected_point(), Some(3));
    assert_eq!(curve.name(), "Bezier (3 points)");
}

#[test]
fn test_add_point_offset_respects_zoom() {
    let mut view = view();
    view.set_zoom(2.0, 1.0);
    let mut curve = BezierCurve::new(&view, Rgb::BLACK);
    curve.add_point(&view, IVec2::new(100, 0));
    let points = curve.points();
    assert_relative_eq!(points[3].x, 50.0);
    assert_relative_eq!(points[4].x - points[3].x, 6.25);
}

#[test]
fn test_add_point_on_empty_curve_resets() {
    let view = view();
    let mut curve = BezierCurve::empty(&view, Rgb::BLACK);
    assert_eq!(curve.add_point(&view, IVec2::new(30, 10)), Some(0));
    assert_eq!(curve.num_points(), 4);
}

#[test]
fn test_deletable_and_endpoints() {
    let view = view();
    let curve = curve_with_middle_anchor(&view);
    assert!(curve.is_deletable(3));
    assert!(!curve.is_deletable(0));
    assert!(!curve.is_deletable(6));
    assert!(!curve.is_deletable(2));
    assert!(curve.is_endpoint(0));
    assert!(curve.is_endpoint(6));
}

#[test]
fn test_remove_point_roundtrip_and_noops() {
    let view = view();
    let mut curve = BezierCurve::new(&view, Rgb::BLACK);
    let before = curve.points();
    let anchor = curve.add_point(&view, IVec2::new(50, 0)).expect("Anker erwartet");

    assert!(!curve.remove_point(0));
    assert!(!curve.remove_point(6));
    assert!(!curve.remove_point(4));
    assert_eq!(curve.num_points(), 7);

    assert!(curve.remove_point(anchor));
    assert_eq!(curve.points(), before);
    assert_eq!(curve.selected_point(), None);
}

// ── Selektion ──

#[test]
fn test_select_handle_uses_half_radius() {
    let view = view();
    let mut curve = BezierCurve::new(&view, Rgb::BLACK);
    // Griff 1 liegt bei x = 12.5 → Pixel 13
    assert_eq!(curve.select_point(&view, IVec2::new(14, 1), None), Some(1));
    curve.set_selected_point(None);
    assert_eq!(curve.select_point(&view, IVec2::new(16, 0), None), None);
    // Anker mit vollem Radius
    assert_eq!(curve.select_point(&view, IVec2::new(4, 4), None), Some(0));
}

#[test]
fn test_opposite_index_pairs_handles() {
    assert_eq!(opposite_index(0), None);
    assert_eq!(opposite_index(1), None);
    assert_eq!(opposite_index(2), Some(4));
    assert_eq!(opposite_index(4), Some(2));
    assert_eq!(opposite_index(3), None);
}

#[test]
fn test_view_pixels_follow_points() {
    let view = view();
    let curve = curve_with_middle_anchor(&view);
    let xs: Vec<i32> = curve.view_pixels(&view).iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0, 13, 38, 50, 63, 88, 100]);
    assert!(curve.view_pixels(&view).iter().all(|p| p.y == 0));
}

// ── Verschieben ──

#[test]
fn test_move_anchor_carries_handles() {
    let view = view();
    let mut curve = curve_with_middle_anchor(&view);
    assert_eq!(curve.select_point(&view, IVec2::new(50, 0), None), Some(3));
    curve.move_selected_point(&view, IVec2::new(60, 30));

    let points = curve.points();
    assert_relative_eq!(points[3].x, 60.0, epsilon = 1e-9);
    assert_relative_eq!(points[3].y, 0.3, epsilon = 1e-9);
    assert_relative_eq!(points[2].x, 47.5, epsilon = 1e-9);
    assert_relative_eq!(points[4].x, 72.5, epsilon = 1e-9);
    assert_relative_eq!(points[2].y, 0.3, epsilon = 1e-9);
    assert_relative_eq!(points[4].y, 0.3, epsilon = 1e-9);
}

#[test]
fn test_move_endpoint_stays_on_baseline() {
    let view = view();
    let mut curve = BezierCurve::new(&view, Rgb::BLACK);
    assert_eq!(curve.select_point(&view, IVec2::new(0, 0), None), Some(0));
    curve.move_selected_point(&view, IVec2::new(5, 40));
    let points = curve.points();
    assert_relative_eq!(points[0].x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(points[0].y, 0.0);
    assert_relative_eq!(points[1].x, 17.5, epsilon = 1e-9);
}

#[test]
fn test_move_anchor_is_clamped_to_chart() {
    let view = view();
    let mut curve = curve_with_middle_anchor(&view);
    curve.select_point(&view, IVec2::new(50, 0), None);
    curve.move_selected_point(&view, IVec2::new(500, 500));
    let anchor = curve.points()[3];
    assert_relative_eq!(anchor.x, 99.0, epsilon = 1e-9);
    assert_relative_eq!(anchor.y, 1.0, epsilon = 1e-9);
}

#[test]
fn test_move_handle_mirrors_opposite_colinear() {
    let view = view();
    let mut curve = curve_with_middle_anchor(&view);
    assert_eq!(curve.select_point(&view, IVec2::new(63, 0), None), Some(4));
    curve.move_selected_point(&view, IVec2::new(60, 20));

    let points = curve.points();
    let anchor = points[3];
    assert_relative_eq!(points[4].x, 60.0, epsilon = 1e-9);
    assert_relative_eq!(points[4].y, 0.2, epsilon = 1e-9);
    assert!(cross(points[2] - anchor, points[4] - anchor).abs() < 1e-9);
    // Spiegelung liegt auf der anderen Seite des Ankers
    assert!((points[2] - anchor).dot(points[4] - anchor) < 0.0);
    let opposite_px = view.data_to_pixel(points[2]) - view.data_to_pixel(anchor);
    assert_relative_eq!(opposite_px.length(), 12.5, epsilon = 1e-9);
}

#[test]
fn test_mirror_after_programmatic_selection() {
    let view = view();
    let mut curve = curve_with_middle_anchor(&view);
    curve.set_selected_point(Some(4));
    curve.move_selected_point(&view, IVec2::new(60, 20));

    let points = curve.points();
    let anchor = points[3];
    assert_relative_eq!(points[4].x, 60.0, epsilon = 1e-9);
    assert_relative_eq!(points[4].y, 0.2, epsilon = 1e-9);
    assert!(cross(points[2] - anchor, points[4] - anchor).abs() < 1e-9);
    assert!((points[2] - anchor).dot(points[4] - anchor) < 0.0);
    let opposite_px = view.data_to_pixel(points[2]) - view.data_to_pixel(anchor);
    assert_relative_eq!(opposite_px.length(), 12.5, epsilon = 1e-9);
}

#[test]
fn test_single_pixel_chart_keeps_points_finite() {
    let view = ChartView::new([0.0, 100.0], [0.0, 1.0], 100, 1);
    let mut curve = BezierCurve::new(&view, Rgb::BLACK);
    curve.add_point(&view, IVec2::new(50, 0));
    curve.set_selected_point(Some(3));
    curve.move_selected_point(&view, IVec2::new(40, 0));
    assert!(curve
        .points()
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite()));
    assert_relative_eq!(curve.points()[3].x, 40.0, epsilon = 1e-9);
}

#[test]
fn test_zero_length_handle_is_neutral() {
    let view = view();
    let mut curve = BezierCurve::empty(&view, Rgb::BLACK);
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (50.0, 0.5), (50.0, 0.5), (50.0, 0.5), (90.0, 0.0), (100.0, 0.0)] {
        curve.push_back(x, y);
    }
    curve.set_selected_point(Some(4));
    curve.move_selected_point(&view, IVec2::new(50, 50));
    assert!(curve
        .points()
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite()));
    assert_relative_eq!(curve.points()[2].x, 50.0);
}

#[test]
fn test_finish_drag_clips_view_point() {
    let view = view();
    let mut curve = curve_with_middle_anchor(&view);
    curve.select_point(&view, IVec2::new(63, 0), None);
    curve.move_selected_point(&view, IVec2::new(150, 50));
    curve.finish_drag(&view);
    let handle = curve.bezier_points()[4];
    assert_relative_eq!(handle.value.x, 150.0, epsilon = 1e-9);
    assert_relative_eq!(handle.view.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(handle.view.y, 0.0 + (100.0 - 50.0) / (150.0 - 50.0) * 0.5, epsilon = 1e-9);
}

// ── Klemmen ──

#[test]
fn test_clip_vertical_border_before_horizontal() {
    let view = view();
    let inside = DVec2::new(40.0, 0.5);
    assert_eq!(clip_to_visible(&view, DVec2::new(50.0, 0.5), inside), inside);

    let clipped = clip_to_visible(&view, DVec2::new(50.0, 0.5), DVec2::new(150.0, 0.5));
    assert_relative_eq!(clipped.x, 100.0);
    assert_relative_eq!(clipped.y, 0.5);

    let clipped = clip_to_visible(&view, DVec2::new(90.0, 0.5), DVec2::new(120.0, 1.5));
    assert_relative_eq!(clipped.x, 100.0);
    assert_relative_eq!(clipped.y, 0.5 + 1.0 / 3.0, epsilon = 1e-12);

    let clipped = clip_to_visible(&view, DVec2::new(50.0, 0.5), DVec2::new(50.0, 2.0));
    assert_relative_eq!(clipped.x, 50.0);
    assert_relative_eq!(clipped.y, 1.0);
}

// ── Auswertung ──

#[test]
fn test_sample_covers_curve() {
    let view = view();
    let curve = curve_with_middle_anchor(&view);
    let samples = curve.sample(10);
    assert_eq!(samples.len(), 21);
    assert_relative_eq!(samples[0].x, 0.0);
    assert_relative_eq!(samples[10].x, 50.0);
    assert_relative_eq!(samples[20].x, 100.0);
}
