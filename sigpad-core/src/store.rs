//! # Ink stroke store
//!
//! Owns every finalized stroke, the stroke currently being drawn, and the dirty rectangle used for
//! incremental redraw. Nothing outside holds a mutable handle to any of it.
//!
//! Lifecycle of a stroke: [`InkStrokeStore::begin`] → any number of [`InkStrokeStore::extend`] →
//! [`InkStrokeStore::finish`]. Only finished strokes are part of the signature.

use crate::{
    color::Color,
    geom::{Point, Rect},
    stroke::Stroke,
};

/// Tunables for stroke capture.
#[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Samples closer than this to the last recorded point are dropped.
    pub min_movement: f32,
    /// Interpolated segments per pair of samples when smoothing a finished stroke.
    pub granularity: u32,
}
impl StoreConfig {
    pub const DEFAULT_MIN_MOVEMENT: f32 = 2.0;
    pub const DEFAULT_GRANULARITY: u32 = 4;
}
impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            min_movement: Self::DEFAULT_MIN_MOVEMENT,
            granularity: Self::DEFAULT_GRANULARITY,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InkStrokeStore {
    config: StoreConfig,
    strokes: Vec<Stroke>,
    /// `Some` while tracking a pointer.
    current: Option<Stroke>,
    dirty: Option<Rect>,
}
impl InkStrokeStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.config
    }
    pub fn set_config(&mut self, config: StoreConfig) {
        self.config = config;
    }
    /// Finalized strokes, in drawing order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }
    /// The stroke under construction, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.current.is_some()
    }
    /// No finalized ink. A stroke still being drawn does not count!
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.strokes.iter().all(Stroke::is_empty)
    }
    /// Region touched since the current stroke began. `None` when nothing has been tracked since the
    /// last clear.
    #[must_use]
    pub fn dirty_rect(&self) -> Option<Rect> {
        self.dirty
    }
    /// Tight bounds over every finalized point.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(Rect::union)
    }
    /// Widest finalized stroke. `None` if blank.
    #[must_use]
    pub fn max_width(&self) -> Option<f32> {
        self.strokes.iter().map(Stroke::width).reduce(f32::max)
    }

    /// Pointer down. A stroke already in progress is finished first rather than dropped.
    pub fn begin(&mut self, point: Point, color: Color, width: f32) {
        if self.current.is_some() {
            log::debug!("stroke began while another was in progress, finishing the old one");
            self.finish(None);
        }
        self.current = Some(Stroke::starting_at(point, color, width));
        self.dirty = Some(Rect::at(point));
    }
    /// Pointer motion. Returns whether the point was recorded - it isn't if nothing is being
    /// tracked, or if it's within `min_movement` of the last recorded point.
    pub fn extend(&mut self, point: Point) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        if current.last().distance(point) < self.config.min_movement {
            return false;
        }
        current.push(point);
        if let Some(dirty) = self.dirty.as_mut() {
            dirty.include(point);
        }
        true
    }
    /// Pointer up (or cancel). Records the final point under the same movement rule, smooths the
    /// stroke, and appends it to the signature.
    ///
    /// Returns the finalized stroke, or `None` if nothing was being tracked.
    pub fn finish(&mut self, point: Option<Point>) -> Option<&Stroke> {
        if let Some(point) = point {
            self.extend(point);
        }
        let mut stroke = self.current.take()?;
        let smoothed = crate::smooth::smooth(stroke.points(), self.config.granularity);
        log::debug!(
            "stroke finished: {} samples, {} after smoothing",
            stroke.len(),
            smoothed.points.len()
        );
        stroke.replace_points(smoothed.points);
        self.strokes.push(stroke);
        self.strokes.last()
    }
    /// Forget everything, including a stroke in progress. Returns whether there was anything to
    /// forget.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.strokes.is_empty() || self.current.is_some();
        self.strokes.clear();
        self.current = None;
        self.dirty = None;
        had_any
    }
    /// Append a ready-made stroke, bypassing capture and smoothing.
    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }
    /// Append strokes from raw point lists, bypassing capture and smoothing. Empty lists are
    /// skipped. Returns how many strokes were added.
    pub fn add_strokes<I>(&mut self, strokes: I, color: Color, width: f32) -> usize
    where
        I: IntoIterator<Item = Vec<Point>>,
    {
        let before = self.strokes.len();
        self.strokes.extend(
            strokes
                .into_iter()
                .filter_map(|points| Stroke::new(points, color, width)),
        );
        self.strokes.len() - before
    }
    /// Apply one color and width to every stroke, including the one in progress.
    pub fn restyle(&mut self, color: Color, width: f32) {
        for stroke in self.strokes.iter_mut().chain(self.current.as_mut()) {
            stroke.restyle(color, width);
        }
    }
}
