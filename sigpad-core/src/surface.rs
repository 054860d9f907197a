//! # Signature surface
//!
//! The piece a host widget talks to. Feed it [`PointerEvent`]s, ask it what to redraw, read back
//! the signature as points, or export it as an image.

use smallvec::SmallVec;

use crate::{
    color::Color,
    export::{ImageConstructionArguments, ImageConstructionSettings, SignatureExtent},
    geom::{Point, Rect},
    render::{self, EncodeError, EncodeFormat},
    store::{InkStrokeStore, StoreConfig},
    stroke::{self, Stroke},
};

/// Pending notifications past this many are dropped for slow listeners.
const EVENT_CAPACITY: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Begin,
    Move,
    End,
    /// The platform took the pointer away. Finishes the stroke just like [`Phase::End`].
    Cancel,
}

/// One pointer callback from the host, in surface-local coordinates.
#[derive(Clone, PartialEq, Debug)]
pub struct PointerEvent {
    pub phase: Phase,
    pub position: Point,
    /// Samples coalesced by high-frequency hardware since the previous callback, oldest first.
    /// Replayed before `position`. Ignored for [`Phase::Begin`].
    pub history: SmallVec<[Point; 4]>,
}
impl PointerEvent {
    #[must_use]
    pub fn new(phase: Phase, position: Point) -> Self {
        Self {
            phase,
            position,
            history: SmallVec::new(),
        }
    }
    #[must_use]
    pub fn with_history<I: IntoIterator<Item = Point>>(mut self, history: I) -> Self {
        self.history.extend(history);
        self
    }
}

/// Notifications for the host UI.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SurfaceEvent {
    /// [`SignatureSurface::clear`] was called. Sent on every call, blank or not.
    Cleared,
    /// A gesture finished, or a load produced a non-blank signature.
    StrokeCompleted,
    /// The blank state actually flipped. Carries the new [`SignatureSurface::is_blank`].
    BlankChanged(bool),
}

/// What the host should repaint after an operation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Invalidation {
    None,
    Region(Rect),
    Full,
}

#[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub background_color: Color,
    pub capture: StoreConfig,
}
impl SurfaceConfig {
    pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
}
impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            background_color: Color::TRANSPARENT,
            capture: StoreConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct SignatureSurface {
    store: InkStrokeStore,
    config: SurfaceConfig,
    size: [f32; 2],
    events: tokio::sync::broadcast::Sender<SurfaceEvent>,
}
impl SignatureSurface {
    #[must_use]
    pub fn new(width: f32, height: f32, config: SurfaceConfig) -> Self {
        let (events, _) = tokio::sync::broadcast::channel(EVENT_CAPACITY);
        Self {
            store: InkStrokeStore::new(config.capture),
            config,
            size: [width, height],
            events,
        }
    }
    /// Listen for [`SurfaceEvent`]s from now on.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }
    #[must_use]
    pub fn size(&self) -> [f32; 2] {
        self.size
    }
    pub fn resize(&mut self, width: f32, height: f32) -> Invalidation {
        self.size = [width, height];
        Invalidation::Full
    }
    /// Read-only access to the strokes, finalized and in progress.
    #[must_use]
    pub fn stroke_store(&self) -> &InkStrokeStore {
        &self.store
    }
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.store.is_blank()
    }
    /// The signature as one array, strokes separated by [`Point::ORIGIN`].
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        stroke::flatten(self.store.strokes().iter().map(Stroke::points))
    }
    /// The signature as one point list per stroke.
    #[must_use]
    pub fn strokes(&self) -> Vec<Vec<Point>> {
        self.store
            .strokes()
            .iter()
            .map(|stroke| stroke.points().to_vec())
            .collect()
    }

    /// Apply a pointer callback.
    pub fn handle(&mut self, event: &PointerEvent) -> Invalidation {
        let was_blank = self.is_blank();
        let invalidation = match event.phase {
            Phase::Begin => {
                let interrupted = self.store.is_tracking();
                let previous = self.store.dirty_rect();
                self.store
                    .begin(event.position, self.config.stroke_color, self.config.stroke_width);
                if interrupted {
                    // The store finished and smoothed the old stroke for us, repaint all of it.
                    self.notify(SurfaceEvent::StrokeCompleted);
                    let finished = self.store.strokes().last().map(Stroke::bounds);
                    [previous, finished, self.store.dirty_rect()]
                        .into_iter()
                        .flatten()
                        .reduce(Rect::union)
                        .map_or(Invalidation::None, |rect| {
                            Invalidation::Region(self.pad_for_stroke(rect))
                        })
                } else {
                    self.dirty_region()
                }
            }
            Phase::Move | Phase::End | Phase::Cancel if !self.store.is_tracking() => {
                log::trace!("ignoring {:?} without a stroke in progress", event.phase);
                Invalidation::None
            }
            Phase::Move => {
                for &point in event.history.iter().chain([&event.position]) {
                    self.store.extend(point);
                }
                self.dirty_region()
            }
            Phase::End | Phase::Cancel => {
                for &point in &event.history {
                    self.store.extend(point);
                }
                let dirty = self.dirty_region();
                let finished = self
                    .store
                    .finish(Some(event.position))
                    .map(Stroke::bounds);
                self.notify(SurfaceEvent::StrokeCompleted);
                // Smoothing can bulge past the raw samples.
                match (dirty, finished) {
                    (Invalidation::Region(dirty), Some(bounds)) => {
                        Invalidation::Region(dirty.union(self.pad_for_stroke(bounds)))
                    }
                    (dirty, _) => dirty,
                }
            }
        };
        self.notify_blank_change(was_blank);
        invalidation
    }
    /// Drop the whole signature, including any stroke in progress. Always notifies
    /// [`SurfaceEvent::Cleared`].
    pub fn clear(&mut self) -> Invalidation {
        let was_blank = self.is_blank();
        self.store.clear();
        self.notify(SurfaceEvent::Cleared);
        self.notify_blank_change(was_blank);
        Invalidation::Full
    }
    /// Replace the signature with a flattened point array. See [`SignatureSurface::points`].
    pub fn load_points(&mut self, points: &[Point]) -> Invalidation {
        self.load_strokes(stroke::unflatten(points))
    }
    /// Replace the signature with the given strokes, unsmoothed, in the current stroke style.
    /// Empty strokes are skipped.
    pub fn load_strokes<I>(&mut self, strokes: I) -> Invalidation
    where
        I: IntoIterator<Item = Vec<Point>>,
    {
        let was_blank = self.is_blank();
        self.store.clear();
        let added = self.store.add_strokes(
            strokes,
            self.config.stroke_color,
            self.config.stroke_width,
        );
        log::debug!("loaded {added} strokes");
        if !self.is_blank() {
            self.notify(SurfaceEvent::StrokeCompleted);
        }
        self.notify_blank_change(was_blank);
        Invalidation::Full
    }
    /// Recolor the pen, along with everything already drawn.
    pub fn set_stroke_color(&mut self, color: Color) -> Invalidation {
        self.config.stroke_color = color;
        self.restyle()
    }
    /// Resize the pen, along with everything already drawn.
    pub fn set_stroke_width(&mut self, width: f32) -> Invalidation {
        self.config.stroke_width = width;
        self.restyle()
    }
    pub fn set_background_color(&mut self, color: Color) -> Invalidation {
        self.config.background_color = color;
        Invalidation::Full
    }
    /// Change capture tunables. Takes effect for the next sample.
    pub fn set_capture(&mut self, capture: StoreConfig) {
        self.config.capture = capture;
        self.store.set_config(capture);
    }

    /// Paint the background and every stroke, in-progress included, at 1:1 onto `pixmap`.
    pub fn draw(&self, pixmap: &mut tiny_skia::Pixmap) {
        pixmap.fill(self.config.background_color.into());
        for stroke in self.store.strokes().iter().chain(self.store.current()) {
            render::draw_stroke(
                pixmap,
                stroke.points(),
                stroke.color(),
                stroke.width(),
                tiny_skia::Transform::identity(),
            );
        }
    }

    /// Resolve export geometry for the finalized strokes. `None` if no image can be made.
    #[must_use]
    pub fn image_construction_arguments(
        &self,
        settings: &ImageConstructionSettings,
    ) -> Option<ImageConstructionArguments> {
        let extent = SignatureExtent {
            surface: self.size,
            bounds: if self.is_blank() {
                None
            } else {
                self.store.bounds()
            },
            stroke_width: self
                .store
                .max_width()
                .unwrap_or(self.config.stroke_width),
        };
        crate::export::resolve(settings, &extent)
    }
    /// Render the signature to a bitmap. `None` if blank or the settings are degenerate.
    #[must_use]
    pub fn image(&self, settings: &ImageConstructionSettings) -> Option<image::RgbaImage> {
        let args = self.image_construction_arguments(settings)?;
        let pixmap = render::rasterize(self.store.strokes(), &args)?;
        Some(render::to_image(&pixmap))
    }
    /// Render and encode the signature. The encode runs on tokio's blocking pool.
    ///
    /// `None` if there is nothing to export, or if encoding failed (logged).
    pub async fn image_stream(
        &self,
        format: EncodeFormat,
        settings: &ImageConstructionSettings,
    ) -> Option<Vec<u8>> {
        let image = self.image(settings)?;
        let encoded = tokio::task::spawn_blocking(move || render::encode(&image, format))
            .await
            .map_err(EncodeError::from)
            .and_then(|result| result);
        match encoded {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("failed to encode signature as {format}: {e}");
                None
            }
        }
    }

    fn restyle(&mut self) -> Invalidation {
        self.store
            .restyle(self.config.stroke_color, self.config.stroke_width);
        Invalidation::Full
    }
    fn pad_for_stroke(&self, rect: Rect) -> Rect {
        // Extra pixel for antialiasing fringe.
        rect.inflate(self.config.stroke_width / 2.0 + 1.0)
    }
    fn dirty_region(&self) -> Invalidation {
        self.store
            .dirty_rect()
            .map_or(Invalidation::None, |dirty| {
                Invalidation::Region(self.pad_for_stroke(dirty))
            })
    }
    fn notify(&self, event: SurfaceEvent) {
        // Err just means nobody is listening.
        let _ = self.events.send(event);
    }
    fn notify_blank_change(&self, was_blank: bool) {
        let is_blank = self.is_blank();
        if is_blank != was_blank {
            self.notify(SurfaceEvent::BlankChanged(is_blank));
        }
    }
}
