use ortho_vectorizer::edges::EdgeMask;
use ortho_vectorizer::RasterBuffer;

/// Rasterize the segment `p0 → p1` into a `w × h` mask by rounding evenly
/// spaced samples.
pub fn line_mask(w: usize, h: usize, p0: [f64; 2], p1: [f64; 2]) -> EdgeMask {
    let mut mask = EdgeMask::new(w, h);
    let steps = (p1[0] - p0[0]).abs().max((p1[1] - p0[1]).abs()).ceil() as usize;
    for s in 0..=steps {
        let t = s as f64 / steps.max(1) as f64;
        let x = (p0[0] + t * (p1[0] - p0[0])).round() as usize;
        let y = (p0[1] + t * (p1[1] - p0[1])).round() as usize;
        mask.set(x, y, true);
    }
    mask
}

/// 320×240 mask holding one 250 px edge at `angle_deg`, starting at (40, 40).
pub fn angled_line_mask(angle_deg: f64) -> EdgeMask {
    let (s, c) = angle_deg.to_radians().sin_cos();
    line_mask(320, 240, [40.0, 40.0], [40.0 + 250.0 * c, 40.0 + 250.0 * s])
}

/// Gray raster split by the line through `through` at `angle_deg`: `dark`
/// on one side, `bright` on the other.
pub fn half_plane_raster(
    width: usize,
    height: usize,
    through: [f64; 2],
    angle_deg: f64,
    dark: u8,
    bright: u8,
) -> RasterBuffer {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let mut data = vec![dark; width * height];
    for y in 0..height {
        for x in 0..width {
            let side = -(x as f64 - through[0]) * s + (y as f64 - through[1]) * c;
            if side > 0.0 {
                data[y * width + x] = bright;
            }
        }
    }
    RasterBuffer::gray(width, height, data).expect("synthetic raster dimensions")
}

/// Gray raster with one bright axis-aligned rectangle.
pub fn rectangle_raster(width: usize, height: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> RasterBuffer {
    let mut data = vec![30u8; width * height];
    for y in y0..y1 {
        for x in x0..x1 {
            data[y * width + x] = 220;
        }
    }
    RasterBuffer::gray(width, height, data).expect("synthetic raster dimensions")
}
