//! Plain geometry shared by the store, the surface and export.
//! Everything is in surface-local, device-independent units.

/// A 2D position. Compares by value only.
///
/// Serialized as a two-element `[x, y]` array, so a flattened point list reads naturally in text formats.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Default,
    Debug,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    /// The origin, also used as the stroke separator in flattened point arrays.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
    /// Is this the flattened-array stroke separator?
    ///
    /// A point genuinely drawn at the origin also answers `true`, there is no way to tell them apart.
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == Self::ORIGIN
    }
}
impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}
impl From<Point> for [f32; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// Axis-aligned rectangle, edges inclusive. `left <= right` and `top <= bottom` for every
/// rect produced by this module.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}
impl Rect {
    #[must_use]
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }
    /// Rect spanning `(0,0)` to `(width, height)`
    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::from_ltrb(0.0, 0.0, width, height)
    }
    /// Zero-area rect located at `point`.
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self {
            left: point.x,
            top: point.y,
            right: point.x,
            bottom: point.y,
        }
    }
    /// Tight bounds of the given points, `None` if there are none.
    pub fn bounding<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::at(first), Self::including))
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
    /// True if the rect covers no area. A rect of a single point is empty!
    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Written to also catch NaN edges
        !(self.width() > 0.0 && self.height() > 0.0)
    }
    /// Grow to include `point`.
    pub fn include(&mut self, point: Point) {
        self.left = self.left.min(point.x);
        self.top = self.top.min(point.y);
        self.right = self.right.max(point.x);
        self.bottom = self.bottom.max(point.y);
    }
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn including(mut self, point: Point) -> Self {
        self.include(point);
        self
    }
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
    /// Push every edge outward by `amount`. Negative amounts shrink, never past the center.
    #[must_use = "returns a new rect without modifying `self`"]
    pub fn inflate(self, amount: f32) -> Self {
        let center_x = (self.left + self.right) / 2.0;
        let center_y = (self.top + self.bottom) / 2.0;
        Self {
            left: (self.left - amount).min(center_x),
            top: (self.top - amount).min(center_y),
            right: (self.right + amount).max(center_x),
            bottom: (self.bottom + amount).max(center_y),
        }
    }
    /// Overlapping region of the two rects. `None` if they don't touch.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        (left <= right && top <= bottom).then_some(Self {
            left,
            top,
            right,
            bottom,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Point, Rect};

    #[test]
    fn bounding() {
        assert_eq!(Rect::bounding([]), None);
        let rect = Rect::bounding([
            Point::new(5.0, 1.0),
            Point::new(-2.0, 4.0),
            Point::new(3.0, 9.0),
        ])
        .unwrap();
        assert_eq!(rect, Rect::from_ltrb(-2.0, 1.0, 5.0, 9.0));
    }
    #[test]
    fn single_point_is_empty() {
        let rect = Rect::at(Point::new(3.0, 3.0));
        assert!(rect.is_empty());
        assert!(!rect.inflate(1.0).is_empty());
    }
    #[test]
    fn inflate_and_clamp() {
        let rect = Rect::from_ltrb(10.0, 10.0, 20.0, 30.0).inflate(15.0);
        assert_eq!(rect, Rect::from_ltrb(-5.0, -5.0, 35.0, 45.0));

        let clamped = rect.intersect(Rect::from_size(25.0, 100.0)).unwrap();
        assert_eq!(clamped, Rect::from_ltrb(0.0, 0.0, 25.0, 45.0));

        // Shrinking collapses at the center instead of inverting.
        let collapsed = Rect::from_ltrb(0.0, 0.0, 4.0, 2.0).inflate(-10.0);
        assert_eq!(collapsed, Rect::from_ltrb(2.0, 1.0, 2.0, 1.0));
    }
    #[test]
    fn disjoint_intersection() {
        let a = Rect::from_size(5.0, 5.0);
        let b = Rect::from_ltrb(6.0, 6.0, 7.0, 7.0);
        assert_eq!(a.intersect(b), None);
    }
    #[test]
    fn point_as_floats() {
        let points = [Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let floats: &[f32] = bytemuck::cast_slice(&points);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
