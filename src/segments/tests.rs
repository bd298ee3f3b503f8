use super::*;
use crate::image::ImageView;

fn options(threshold: u32, min_len: f64) -> HoughOptions {
    HoughOptions {
        accumulator_threshold: threshold,
        min_line_length: min_len,
        ..HoughOptions::default()
    }
}

/// Rasterize a segment by rounding evenly spaced samples.
fn draw_line(w: usize, h: usize, p0: [f64; 2], p1: [f64; 2]) -> EdgeMask {
    let mut mask = EdgeMask::new(w, h);
    let steps = ((p1[0] - p0[0]).abs().max((p1[1] - p0[1]).abs())).ceil() as usize;
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = (p0[0] + t * (p1[0] - p0[0])).round() as usize;
        let y = (p0[1] + t * (p1[1] - p0[1])).round() as usize;
        mask.set(x, y, true);
    }
    mask
}

#[test]
fn blank_mask_yields_no_segments() {
    let mask = EdgeMask::new(64, 48);
    assert!(detect_segments(&mask, &HoughOptions::default()).is_empty());
}

#[test]
fn dimension_mismatch_is_an_input_error() {
    let mask = EdgeMask::new(64, 48);
    let err = SegmentDetector::new(HoughOptions::default())
        .detect(&mask, 48, 64)
        .unwrap_err();
    assert!(matches!(err, InputError::MaskDimensions { mask_w: 64, .. }));
}

#[test]
fn diagonal_line_is_found_once() {
    let dir = 37f64.to_radians();
    let p0 = [40.0, 40.0];
    let p1 = [40.0 + 250.0 * dir.cos(), 40.0 + 250.0 * dir.sin()];
    let mask = draw_line(320, 240, p0, p1);
    let segs = detect_segments(&mask, &options(50, 100.0));
    assert_eq!(segs.len(), 1, "segments {segs:?}");
    let s = &segs[0];
    assert!((s.angle_deg() - 37.0).abs() < 1.5, "angle {}", s.angle_deg());
    assert!(s.length() > 200.0, "length {}", s.length());
}

#[test]
fn short_lines_are_dropped() {
    let mask = EdgeMask::from_fn(100, 100, |x, y| y == 50 && (10..60).contains(&x));
    assert_eq!(mask.dimensions(), (100, 100));
    assert!(detect_segments(&mask, &options(20, 80.0)).is_empty());
}

#[test]
fn two_distinct_walls_give_two_segments() {
    let mask = EdgeMask::from_fn(300, 300, |x, y| {
        (y == 40 && (20..280).contains(&x)) || (x == 150 && (80..280).contains(&y))
    });
    let mut segs = detect_segments(&mask, &options(60, 100.0));
    segs.sort_by(|a, b| a.angle_deg().total_cmp(&b.angle_deg()));
    assert_eq!(segs.len(), 2, "segments {segs:?}");
    assert!(segs[0].angle_deg() < 1e-9);
    assert!((segs[1].angle_deg() - 90.0).abs() < 1e-9);
}
