//! Progressive probabilistic Hough transform.
//!
//! Edge pixels are visited in a seeded random order. Each visited pixel votes
//! for every `(theta, rho)` cell it lies on (1° by 1 px). As soon as a cell
//! reaches the threshold, the corresponding line is walked outward from the
//! pixel in both directions in 16.16 fixed point, bridging at most
//! `max_line_gap` missing pixels. Pixels on the walk are consumed so they
//! cannot start or join another line, and if the run is long enough the
//! pixels on it that already voted withdraw their votes. Pixels that were
//! consumed before their turn never voted and leave the accumulator alone, so
//! a later run on the same line still collects its own votes.
use super::options::HoughOptions;
use crate::edges::EdgeMask;
use crate::image::ImageView;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const NUM_ANGLES: usize = 180;
const SHIFT: u32 = 16;

/// Run endpoints in integer pixel coordinates `(x0, y0, x1, y1)`.
pub type PixelRun = [i64; 4];

struct TrigTable {
    cos: Vec<f64>,
    sin: Vec<f64>,
}

impl TrigTable {
    fn new() -> Self {
        let step = std::f64::consts::PI / NUM_ANGLES as f64;
        let (cos, sin) = (0..NUM_ANGLES)
            .map(|n| {
                let t = n as f64 * step;
                (t.cos(), t.sin())
            })
            .unzip();
        Self { cos, sin }
    }
}

/// Stepping state for walking one accepted line.
#[derive(Clone, Copy)]
struct Walker {
    x0: i64,
    y0: i64,
    dx0: i64,
    dy0: i64,
    x_major: bool,
}

impl Walker {
    fn new(x: i64, y: i64, cos_t: f64, sin_t: f64) -> Self {
        // line direction is perpendicular to the (cos, sin) normal
        let a = -sin_t;
        let b = cos_t;
        let one = (1i64 << SHIFT) as f64;
        let half = 1i64 << (SHIFT - 1);
        if a.abs() > b.abs() {
            Self {
                x0: x,
                y0: (y << SHIFT) + half,
                dx0: if a > 0.0 { 1 } else { -1 },
                dy0: (b * one / a.abs()).round() as i64,
                x_major: true,
            }
        } else {
            Self {
                x0: (x << SHIFT) + half,
                y0: y,
                dx0: (a * one / b.abs()).round() as i64,
                dy0: if b > 0.0 { 1 } else { -1 },
                x_major: false,
            }
        }
    }

    /// Pixel sequence in direction `k` (0 forward, 1 backward).
    fn steps(self, k: usize) -> impl Iterator<Item = (i64, i64)> {
        let (dx, dy) = if k == 0 {
            (self.dx0, self.dy0)
        } else {
            (-self.dx0, -self.dy0)
        };
        let x_major = self.x_major;
        (0i64..).map(move |s| {
            let x = self.x0 + s * dx;
            let y = self.y0 + s * dy;
            if x_major {
                (x, y >> SHIFT)
            } else {
                (x >> SHIFT, y)
            }
        })
    }
}

/// Detect raw runs on `mask`. Returns runs in acceptance order.
pub fn probabilistic_hough(mask: &EdgeMask, options: &HoughOptions) -> Vec<PixelRun> {
    let (w, h) = mask.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let threshold = i32::try_from(options.accumulator_threshold.max(1)).unwrap_or(i32::MAX);
    let num_rho = (w + h) * 2 + 1;
    let rho_offset = ((num_rho - 1) / 2) as i64;
    let trig = TrigTable::new();

    let mut accum = vec![0i32; NUM_ANGLES * num_rho];
    let mut live: Vec<bool> = mask.as_slice().iter().map(|&v| v != 0).collect();
    let mut voted = vec![false; w * h];
    let mut points = mask.edge_points();
    let mut rng = StdRng::seed_from_u64(options.seed);
    points.shuffle(&mut rng);

    let rho_index = |n: usize, x: i64, y: i64| -> usize {
        let r = (x as f64 * trig.cos[n] + y as f64 * trig.sin[n]).round() as i64;
        n * num_rho + (r + rho_offset) as usize
    };
    let inside = |x: i64, y: i64| x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h;

    let mut runs = Vec::new();
    for (px, py) in points {
        if !live[py * w + px] {
            continue;
        }
        let (x, y) = (px as i64, py as i64);
        voted[py * w + px] = true;

        let mut max_val = threshold - 1;
        let mut max_n = 0usize;
        for n in 0..NUM_ANGLES {
            let cell = &mut accum[rho_index(n, x, y)];
            *cell += 1;
            if *cell > max_val {
                max_val = *cell;
                max_n = n;
            }
        }
        if max_val < threshold {
            continue;
        }

        let walker = Walker::new(x, y, trig.cos[max_n], trig.sin[max_n]);
        let mut line_end = [(x, y); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let mut gap = 0usize;
            for (jx, iy) in walker.steps(k) {
                if !inside(jx, iy) {
                    break;
                }
                if live[iy as usize * w + jx as usize] {
                    gap = 0;
                    *end = (jx, iy);
                } else {
                    gap += 1;
                    if gap as f64 > options.max_line_gap {
                        break;
                    }
                }
            }
        }

        let ddx = (line_end[1].0 - line_end[0].0) as f64;
        let ddy = (line_end[1].1 - line_end[0].1) as f64;
        let good_line = (ddx * ddx + ddy * ddy).sqrt() >= options.min_line_length;

        for (k, &end) in line_end.iter().enumerate() {
            for (jx, iy) in walker.steps(k) {
                if !inside(jx, iy) {
                    break;
                }
                let idx = iy as usize * w + jx as usize;
                if live[idx] {
                    if good_line && voted[idx] {
                        for n in 0..NUM_ANGLES {
                            accum[rho_index(n, jx, iy)] -= 1;
                        }
                    }
                    live[idx] = false;
                }
                if (jx, iy) == end {
                    break;
                }
            }
        }

        if good_line {
            runs.push([line_end[0].0, line_end[0].1, line_end[1].0, line_end[1].1]);
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_is_one_run() {
        let mask = EdgeMask::from_fn(200, 40, |x, y| y == 20 && (20..180).contains(&x));
        let opts = HoughOptions {
            accumulator_threshold: 50,
            min_line_length: 100.0,
            ..HoughOptions::default()
        };
        let runs = probabilistic_hough(&mask, &opts);
        assert_eq!(runs.len(), 1, "runs {runs:?}");
        let [x0, y0, x1, y1] = runs[0];
        assert_eq!((y0, y1), (20, 20));
        assert_eq!((x0.min(x1), x0.max(x1)), (20, 179));
    }

    #[test]
    fn gaps_beyond_tolerance_split_runs() {
        // 20 px hole in a vertical line
        let mask = EdgeMask::from_fn(40, 300, |x, y| {
            x == 10 && (10..290).contains(&y) && !(140..160).contains(&y)
        });
        let opts = HoughOptions {
            accumulator_threshold: 40,
            min_line_length: 60.0,
            max_line_gap: 5.0,
            ..HoughOptions::default()
        };
        let runs = probabilistic_hough(&mask, &opts);
        assert_eq!(runs.len(), 2, "runs {runs:?}");
        for [x0, _, x1, _] in runs {
            assert_eq!((x0, x1), (10, 10));
        }
    }

    #[test]
    fn both_runs_of_a_broken_line_survive_any_visit_order() {
        let mask = EdgeMask::from_fn(40, 300, |x, y| {
            x == 10 && (10..290).contains(&y) && !(140..160).contains(&y)
        });
        for seed in 0..20 {
            let opts = HoughOptions {
                accumulator_threshold: 40,
                min_line_length: 60.0,
                max_line_gap: 5.0,
                seed,
                ..HoughOptions::default()
            };
            let mut spans: Vec<(i64, i64)> = probabilistic_hough(&mask, &opts)
                .into_iter()
                .map(|[_, y0, _, y1]| (y0.min(y1), y0.max(y1)))
                .collect();
            spans.sort_unstable();
            assert_eq!(spans, vec![(10, 139), (160, 289)], "seed {seed}");
        }
    }

    #[test]
    fn huge_threshold_accepts_nothing() {
        let mask = EdgeMask::from_fn(200, 40, |x, y| y == 20 && (20..180).contains(&x));
        let opts = HoughOptions {
            accumulator_threshold: u32::MAX,
            min_line_length: 10.0,
            ..HoughOptions::default()
        };
        assert!(probabilistic_hough(&mask, &opts).is_empty());
    }

    #[test]
    fn same_seed_same_runs() {
        let mask = EdgeMask::from_fn(120, 120, |x, y| x == y || (y == 60 && x > 10));
        let opts = HoughOptions {
            accumulator_threshold: 30,
            min_line_length: 40.0,
            ..HoughOptions::default()
        };
        assert_eq!(
            probabilistic_hough(&mask, &opts),
            probabilistic_hough(&mask, &opts)
        );
    }
}
