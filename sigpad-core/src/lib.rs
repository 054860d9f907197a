//! # Sigpad core
//!
//! Toolkit-independent signature capture: pointer events go in, a vector signature (strokes of
//! points) and raster images come out. Host platforms only translate their native events into
//! [`surface::PointerEvent`]s and blit the results.

pub mod color;
pub mod export;
pub mod geom;
pub mod render;
pub mod smooth;
pub mod store;
pub mod stroke;
pub mod surface;

pub use color::Color;
pub use export::{ImageConstructionArguments, ImageConstructionSettings, SizeOrScale};
pub use geom::{Point, Rect};
pub use render::EncodeFormat;
pub use store::InkStrokeStore;
pub use stroke::Stroke;
pub use surface::{Invalidation, Phase, PointerEvent, SignatureSurface, SurfaceConfig, SurfaceEvent};
