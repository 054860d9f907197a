//! # Strokes
//!
//! A stroke is one pointer-down-to-up gesture. The signature is an ordered list of them, which
//! may also be exchanged as a single flat point array with [`Point::ORIGIN`] between strokes.

use crate::{color::Color, geom::Point, geom::Rect};

#[derive(Clone, PartialEq, Debug)]
pub struct Stroke {
    /// Invariant: never empty.
    points: Vec<Point>,
    color: Color,
    width: f32,
}
impl Stroke {
    /// Create a stroke. Returns `None` if there are no points, as a stroke always has at least one.
    #[must_use]
    pub fn new(points: Vec<Point>, color: Color, width: f32) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self {
                points,
                color,
                width,
            })
        }
    }
    /// Single-point stroke, as created on pointer down.
    #[must_use]
    pub fn starting_at(point: Point, color: Color, width: f32) -> Self {
        Self {
            points: vec![point],
            color,
            width,
        }
    }
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }
    #[must_use]
    pub fn first(&self) -> Point {
        // Invariant - never empty.
        self.points[0]
    }
    #[must_use]
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// Always false, present for clippy's sake. See [`Stroke::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    #[must_use]
    pub fn bounds(&self) -> Rect {
        // Unwrap OK - never empty.
        Rect::bounding(self.points.iter().copied()).unwrap()
    }
    /// Change the appearance of the stroke. Geometry is never touched after creation, except by the
    /// store while the stroke is in progress.
    pub fn restyle(&mut self, color: Color, width: f32) {
        self.color = color;
        self.width = width;
    }
    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }
    /// Replace the geometry wholesale, keeping the style. Ignores empty replacements.
    pub(crate) fn replace_points(&mut self, points: Vec<Point>) {
        if !points.is_empty() {
            self.points = points;
        }
    }
}

/// Join the strokes into one array, separated by [`Point::ORIGIN`].
///
/// There is no leading or trailing separator.
#[must_use]
pub fn flatten<'a, I>(strokes: I) -> Vec<Point>
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut flat = Vec::new();
    for stroke in strokes {
        if stroke.is_empty() {
            continue;
        }
        if !flat.is_empty() {
            flat.push(Point::ORIGIN);
        }
        flat.extend_from_slice(stroke);
    }
    flat
}

/// Split a flattened array back into strokes. Runs between separators that hold no points
/// (leading, trailing, or doubled separators) produce no stroke.
///
/// Any drawn point exactly at the origin is read as a separator, splitting its stroke in two and
/// losing the point. This is inherent to the format.
#[must_use]
pub fn unflatten(points: &[Point]) -> Vec<Vec<Point>> {
    points
        .split(|point| point.is_sentinel())
        .filter(|run| !run.is_empty())
        .map(<[Point]>::to_vec)
        .collect()
}
