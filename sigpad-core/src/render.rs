//! # Rendering
//!
//! CPU rasterization of strokes with `tiny-skia`, and encoding of the result with `image`.

use crate::{
    color::Color,
    export::ImageConstructionArguments,
    geom::Point,
    stroke::Stroke,
};

/// Container formats for encoded export.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EncodeFormat {
    #[strum(to_string = "png")]
    Png,
    #[strum(to_string = "jpeg", serialize = "jpg")]
    #[serde(alias = "jpg")]
    Jpeg,
}
impl EncodeFormat {
    /// Guess from a file extension, case-insensitive.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("encoder task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Line segments through every point in order. `None` for an empty list.
///
/// A single point makes a zero-length segment, which has no visible stroke - see [`draw_stroke`]
/// for how those are drawn.
#[must_use]
pub fn polyline(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let capacity = points.len().max(2);
    let mut builder = tiny_skia::PathBuilder::with_capacity(capacity, capacity);
    builder.move_to(first.x, first.y);
    if rest.is_empty() {
        builder.line_to(first.x, first.y);
    }
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    builder.finish()
}

/// Draw one stroke with round caps and joins. Strokes that never moved are drawn as a dot.
pub fn draw_stroke(
    pixmap: &mut tiny_skia::Pixmap,
    points: &[Point],
    color: Color,
    width: f32,
    transform: tiny_skia::Transform,
) {
    let Some(&first) = points.first() else {
        return;
    };
    if !(width > 0.0) {
        return;
    }
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(color.into());
    paint.anti_alias = true;

    if points.iter().all(|&point| point == first) {
        if let Some(dot) = tiny_skia::PathBuilder::from_circle(first.x, first.y, width / 2.0) {
            pixmap.fill_path(&dot, &paint, tiny_skia::FillRule::Winding, transform, None);
        }
        return;
    }
    let Some(path) = polyline(points) else {
        return;
    };
    let stroke = tiny_skia::Stroke {
        width,
        line_cap: tiny_skia::LineCap::Round,
        line_join: tiny_skia::LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
}

/// Surface-to-image transform for an export.
#[must_use]
pub fn export_transform(args: &ImageConstructionArguments) -> tiny_skia::Transform {
    tiny_skia::Transform::from_scale(args.scale[0], args.scale[1])
        .pre_translate(-args.source.left, -args.source.top)
}

/// Rasterize strokes as described by resolved export arguments. Overrides in `args` win over each
/// stroke's own style.
#[must_use]
pub fn rasterize<'a, I>(strokes: I, args: &ImageConstructionArguments) -> Option<tiny_skia::Pixmap>
where
    I: IntoIterator<Item = &'a Stroke>,
{
    let mut pixmap = tiny_skia::Pixmap::new(args.width, args.height)?;
    pixmap.fill(args.background_color.into());
    let transform = export_transform(args);
    for stroke in strokes {
        draw_stroke(
            &mut pixmap,
            stroke.points(),
            args.stroke_color.unwrap_or(stroke.color()),
            args.stroke_width.unwrap_or(stroke.width()),
            transform,
        );
    }
    Some(pixmap)
}

/// Un-premultiply into an `image` buffer.
#[must_use]
pub fn to_image(pixmap: &tiny_skia::Pixmap) -> image::RgbaImage {
    let mut image = image::RgbaImage::new(pixmap.width(), pixmap.height());
    for (out, pixel) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = pixel.demultiply();
        *out = image::Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image
}

/// Encode to the given container. JPEG has no alpha, so it is composited over white first.
pub fn encode(image: &image::RgbaImage, format: EncodeFormat) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    match format {
        EncodeFormat::Png => image.write_to(&mut cursor, image::ImageFormat::Png)?,
        EncodeFormat::Jpeg => over_white(image).write_to(&mut cursor, image::ImageFormat::Jpeg)?,
    }
    Ok(bytes)
}

fn over_white(image: &image::RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let a = u16::from(a);
        // Lerp towards white by the uncovered fraction. Sum never exceeds 255*255 + 127, fits in u16.
        let blend = |c: u8| ((u16::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
