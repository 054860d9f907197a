//! # Smoothing
//!
//! Catmull-Rom interpolation of a finished stroke's raw samples. The curve is approximated by
//! emitting extra points between every pair of samples, to be connected with short line segments.

use crate::geom::Point;

/// Below this many points the spline is under-determined, and input is passed through untouched.
pub const MIN_POINTS: usize = 4;

/// Result of [`smooth`].
#[derive(Clone, PartialEq, Debug)]
pub struct Smoothed {
    pub points: Vec<Point>,
}
impl Smoothed {
    /// Drawable polyline through every point. `None` if there are no points.
    #[must_use]
    pub fn path(&self) -> Option<tiny_skia::Path> {
        crate::render::polyline(&self.points)
    }
}

/// Interpolate `granularity - 1` points between each pair of input points.
///
/// The first and last input points are reproduced exactly at the ends of the output.
/// Fewer than [`MIN_POINTS`] inputs are returned as-is. A granularity of zero acts like one.
#[must_use]
pub fn smooth(points: &[Point], granularity: u32) -> Smoothed {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Smoothed { points: Vec::new() };
    };
    if points.len() < MIN_POINTS {
        return Smoothed {
            points: points.to_vec(),
        };
    }
    let granularity = granularity.max(1);

    // Phantom control points at either end so every real segment has four neighbors.
    let mut control = Vec::with_capacity(points.len() + 2);
    control.push(first);
    control.extend_from_slice(points);
    control.push(last);

    let mut out = Vec::with_capacity((points.len() - 1) * granularity as usize + 2);
    out.push(first);
    for window in control.windows(4) {
        let [p0, p1, p2, p3] = [window[0], window[1], window[2], window[3]];
        out.extend((1..granularity).map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 / granularity as f32;
            catmull_rom(p0, p1, p2, p3, t)
        }));
        out.push(p2);
    }
    // The final window already ended on `last`, this closes the path on the exact anchor.
    out.push(last);

    Smoothed { points: out }
}

/// Point at `t` in `[0,1]` on the segment between `p1` and `p2`.
fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let tt = t * t;
    let ttt = tt * t;
    let axis = |p0: f32, p1: f32, p2: f32, p3: f32| {
        0.5 * (2.0 * p1
            + (p2 - p0) * t
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * tt
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * ttt)
    };
    Point::new(
        axis(p0.x, p1.x, p2.x, p3.x),
        axis(p0.y, p1.y, p2.y, p3.y),
    )
}

#[cfg(test)]
mod test {
    use super::{catmull_rom, smooth};
    use crate::Point;

    fn zigzag(len: usize) -> Vec<Point> {
        (0..len)
            .map(|i| {
                let i = i as f32;
                Point::new(i * 10.0 + 0.25, if i as usize % 2 == 0 { 3.0 } else { 17.5 })
            })
            .collect()
    }

    #[test]
    fn short_input_untouched() {
        for len in 0..4 {
            let points = zigzag(len);
            for granularity in [0, 1, 2, 4, 20] {
                assert_eq!(smooth(&points, granularity).points, points);
            }
        }
    }
    #[test]
    fn anchors_exact() {
        for len in [4, 5, 13, 100] {
            let points = zigzag(len);
            for granularity in [1, 2, 4, 20] {
                let smoothed = smooth(&points, granularity).points;
                assert_eq!(smoothed.first(), points.first());
                assert_eq!(smoothed.last(), points.last());
                assert_eq!(smoothed.len(), (len - 1) * granularity as usize + 2);
                assert!(smoothed.len() >= points.len());
            }
        }
    }
    #[test]
    fn passes_through_samples() {
        let points = zigzag(6);
        let granularity = 4;
        let smoothed = smooth(&points, granularity).points;
        // Every real sample sits at a fixed stride after the leading anchor.
        for (i, point) in points.iter().enumerate().skip(1) {
            assert_eq!(smoothed[i * granularity as usize], *point);
        }
    }
    #[test]
    fn colinear_stays_on_line() {
        let points: Vec<_> = (1..=6).map(|i| Point::new(i as f32 * 4.0, 2.0)).collect();
        let smoothed = smooth(&points, 5).points;
        assert!(smoothed.iter().all(|p| (p.y - 2.0).abs() < 1e-5));
        // ..and doesn't backtrack.
        assert!(smoothed.windows(2).all(|w| w[1].x >= w[0].x - 1e-5));
    }
    #[test]
    fn basis_endpoints() {
        let [p0, p1, p2, p3] = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 4.0),
            Point::new(3.0, -2.0),
            Point::new(7.0, 1.0),
        ];
        assert_eq!(catmull_rom(p0, p1, p2, p3, 0.0), p1);
        let end = catmull_rom(p0, p1, p2, p3, 1.0);
        assert!((end.x - p2.x).abs() < 1e-5 && (end.y - p2.y).abs() < 1e-5);
    }
    #[test]
    fn path_through_points() {
        let smoothed = smooth(&zigzag(5), 3);
        let path = smoothed.path().unwrap();
        let mut segments = path.segments();
        let Some(tiny_skia::PathSegment::MoveTo(start)) = segments.next() else {
            panic!("path should open with a move");
        };
        assert_eq!((start.x, start.y), (smoothed.points[0].x, smoothed.points[0].y));
        let ends: Vec<_> = segments
            .map(|segment| match segment {
                tiny_skia::PathSegment::LineTo(to) => Point::new(to.x, to.y),
                other => panic!("unexpected segment {other:?}"),
            })
            .collect();
        assert_eq!(ends.len(), smoothed.points.len() - 1);
        assert_eq!(ends, smoothed.points[1..]);

        assert!(smooth(&[], 4).path().is_none());
    }
    #[test]
    fn input_untouched() {
        let points = zigzag(8);
        let copy = points.clone();
        let _ = smooth(&points, 4);
        assert_eq!(points, copy);
    }
}
