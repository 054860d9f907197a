//! # Export geometry
//!
//! Works out which part of the surface ends up in an exported image, how large that image is, and
//! how surface coordinates map onto it.

use crate::{color::Color, geom::Rect};

/// Requested output dimensions, either absolute or relative to the source region.
#[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeOrScale {
    Size { width: f32, height: f32 },
    Scale(f32),
}
impl SizeOrScale {
    /// All components strictly positive (and not NaN).
    #[must_use]
    pub fn is_valid(self) -> bool {
        match self {
            Self::Size { width, height } => width > 0.0 && height > 0.0,
            Self::Scale(scale) => scale > 0.0,
        }
    }
}
impl Default for SizeOrScale {
    fn default() -> Self {
        Self::Scale(1.0)
    }
}

/// Options for one export. Never stored on the signature.
#[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageConstructionSettings {
    /// Restrict the image to the signature's bounds (plus padding) instead of the whole surface.
    pub should_crop: bool,
    /// Use the same scale on both axes when fitting to a requested size.
    pub keep_aspect_ratio: bool,
    /// Draw every stroke in this color instead of its own.
    pub stroke_color: Option<Color>,
    /// Defaults to transparent.
    pub background_color: Option<Color>,
    /// Draw every stroke at this width instead of its own.
    pub stroke_width: Option<f32>,
    /// Space around the signature when cropping, in surface units.
    pub padding: f32,
    pub desired: SizeOrScale,
}
impl ImageConstructionSettings {
    pub const DEFAULT_PADDING: f32 = 5.0;
}
impl Default for ImageConstructionSettings {
    fn default() -> Self {
        Self {
            should_crop: true,
            keep_aspect_ratio: false,
            stroke_color: None,
            background_color: None,
            stroke_width: None,
            padding: Self::DEFAULT_PADDING,
            desired: SizeOrScale::default(),
        }
    }
}

/// Fully resolved export, ready to rasterize.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ImageConstructionArguments {
    /// Region of the surface being exported.
    pub source: Rect,
    /// Output size in pixels, both nonzero.
    pub width: u32,
    pub height: u32,
    /// Surface units to output pixels, per axis.
    pub scale: [f32; 2],
    pub stroke_color: Option<Color>,
    pub stroke_width: Option<f32>,
    pub background_color: Color,
}

/// What export needs to know about the signature being exported.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SignatureExtent {
    /// Surface size.
    pub surface: [f32; 2],
    /// Tight bounds over every stroke point, `None` if blank.
    pub bounds: Option<Rect>,
    /// Stroke width used to pad the bounds when no override is given.
    pub stroke_width: f32,
}

/// Resolve export geometry. `None` for anything that can't make an image: blank signature,
/// non-positive surface, or non-positive size/scale.
#[must_use]
pub fn resolve(
    settings: &ImageConstructionSettings,
    extent: &SignatureExtent,
) -> Option<ImageConstructionArguments> {
    let [surface_width, surface_height] = extent.surface;
    if !settings.desired.is_valid() || !(surface_width > 0.0 && surface_height > 0.0) {
        return None;
    }
    let bounds = extent.bounds?;
    let surface = Rect::from_size(surface_width, surface_height);

    let (source, size, scale) = if settings.should_crop {
        let stroke_width = settings.stroke_width.unwrap_or(extent.stroke_width).max(0.0);
        let source = bounds
            .inflate(stroke_width / 2.0 + settings.padding.max(0.0))
            .intersect(surface)?;
        if source.is_empty() {
            return None;
        }
        let (size, scale) = fit(settings.desired, settings.keep_aspect_ratio, &source);
        (source, size, scale)
    } else {
        let (size, scale) = fit(settings.desired, settings.keep_aspect_ratio, &surface);
        (surface, size, scale)
    };

    let width = pixels(size[0])?;
    let height = pixels(size[1])?;
    Some(ImageConstructionArguments {
        source,
        width,
        height,
        scale,
        stroke_color: settings.stroke_color,
        stroke_width: settings.stroke_width,
        background_color: settings.background_color.unwrap_or(Color::TRANSPARENT),
    })
}

/// Output size and per-axis scale for drawing `source` under the requested size or scale.
fn fit(desired: SizeOrScale, keep_aspect_ratio: bool, source: &Rect) -> ([f32; 2], [f32; 2]) {
    let (source_width, source_height) = (source.width(), source.height());
    match desired {
        SizeOrScale::Scale(scale) => (
            [source_width * scale, source_height * scale],
            [scale, scale],
        ),
        SizeOrScale::Size { width, height } => {
            let scale_x = width / source_width;
            let scale_y = height / source_height;
            if keep_aspect_ratio {
                // Shrink the image to hug the source, so its aspect matches.
                let scale = scale_x.min(scale_y);
                (
                    [source_width * scale, source_height * scale],
                    [scale, scale],
                )
            } else {
                ([width, height], [scale_x, scale_y])
            }
        }
    }
}

/// Round a dimension up to whole pixels. `None` if that's zero or unrepresentable.
fn pixels(length: f32) -> Option<u32> {
    // Shave float noise so e.g. 100.00001 doesn't become 101.
    let rounded = (length - 1e-3).ceil();
    if rounded >= 1.0 && rounded <= u32::MAX as f32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(rounded as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::{resolve, ImageConstructionSettings, SignatureExtent, SizeOrScale};
    use crate::{Color, Rect};

    /// 50x100 surface with one stroke corner to corner.
    fn full_extent() -> SignatureExtent {
        SignatureExtent {
            surface: [50.0, 100.0],
            bounds: Some(Rect::from_size(50.0, 100.0)),
            stroke_width: 2.0,
        }
    }
    /// 200x200 surface, small signature in the middle.
    fn small_extent() -> SignatureExtent {
        SignatureExtent {
            surface: [200.0, 200.0],
            bounds: Some(Rect::from_ltrb(50.0, 80.0, 90.0, 100.0)),
            stroke_width: 2.0,
        }
    }

    #[test]
    fn degenerate() {
        let extent = full_extent();
        for desired in [
            SizeOrScale::Size {
                width: 0.0,
                height: 50.0,
            },
            SizeOrScale::Size {
                width: 10.0,
                height: -1.0,
            },
            SizeOrScale::Scale(-2.0),
            SizeOrScale::Scale(0.0),
            SizeOrScale::Scale(f32::NAN),
        ] {
            for should_crop in [true, false] {
                let settings = ImageConstructionSettings {
                    desired,
                    should_crop,
                    ..Default::default()
                };
                assert_eq!(resolve(&settings, &extent), None, "{settings:?}");
            }
        }
        // Blank
        let blank = SignatureExtent {
            bounds: None,
            ..extent
        };
        assert_eq!(resolve(&Default::default(), &blank), None);
        // Zero-size surface
        let flat = SignatureExtent {
            surface: [0.0, 100.0],
            ..extent
        };
        assert_eq!(resolve(&Default::default(), &flat), None);
    }
    #[test]
    fn crop_clamps_to_surface() {
        let args = resolve(
            &ImageConstructionSettings {
                keep_aspect_ratio: true,
                ..Default::default()
            },
            &full_extent(),
        )
        .unwrap();
        assert_eq!(args.source, Rect::from_size(50.0, 100.0));
        assert_eq!((args.width, args.height), (50, 100));
        assert_eq!(args.scale, [1.0, 1.0]);
        assert_eq!(args.background_color, Color::TRANSPARENT);
    }
    #[test]
    fn crop_pads() {
        let args = resolve(&Default::default(), &small_extent()).unwrap();
        // 1.0 half-width + 5.0 padding
        assert_eq!(args.source, Rect::from_ltrb(44.0, 74.0, 96.0, 106.0));
        assert_eq!((args.width, args.height), (52, 32));

        let args = resolve(
            &ImageConstructionSettings {
                stroke_width: Some(10.0),
                padding: 0.0,
                ..Default::default()
            },
            &small_extent(),
        )
        .unwrap();
        assert_eq!(args.source, Rect::from_ltrb(45.0, 75.0, 95.0, 105.0));
        assert_eq!(args.stroke_width, Some(10.0));
    }
    #[test]
    fn crop_to_size() {
        // Padded source is 52x32.
        let stretched = resolve(
            &ImageConstructionSettings {
                desired: SizeOrScale::Size {
                    width: 104.0,
                    height: 96.0,
                },
                ..Default::default()
            },
            &small_extent(),
        )
        .unwrap();
        assert_eq!((stretched.width, stretched.height), (104, 96));
        assert_eq!(stretched.scale, [2.0, 3.0]);

        let locked = resolve(
            &ImageConstructionSettings {
                desired: SizeOrScale::Size {
                    width: 104.0,
                    height: 96.0,
                },
                keep_aspect_ratio: true,
                ..Default::default()
            },
            &small_extent(),
        )
        .unwrap();
        assert_eq!(locked.scale, [2.0, 2.0]);
        assert_eq!((locked.width, locked.height), (104, 64));
    }
    #[test]
    fn crop_to_scale() {
        let args = resolve(
            &ImageConstructionSettings {
                desired: SizeOrScale::Scale(0.5),
                ..Default::default()
            },
            &small_extent(),
        )
        .unwrap();
        assert_eq!((args.width, args.height), (26, 16));
        assert_eq!(args.scale, [0.5, 0.5]);
    }
    #[test]
    fn whole_surface() {
        let settings = ImageConstructionSettings {
            should_crop: false,
            desired: SizeOrScale::Size {
                width: 100.0,
                height: 50.0,
            },
            ..Default::default()
        };
        let args = resolve(&settings, &small_extent()).unwrap();
        assert_eq!(args.source, Rect::from_size(200.0, 200.0));
        assert_eq!((args.width, args.height), (100, 50));
        assert_eq!(args.scale, [0.5, 0.25]);

        let args = resolve(
            &ImageConstructionSettings {
                should_crop: false,
                desired: SizeOrScale::Scale(1.5),
                ..Default::default()
            },
            &small_extent(),
        )
        .unwrap();
        assert_eq!((args.width, args.height), (300, 300));
    }
    #[test]
    fn settings_from_toml() {
        let settings: ImageConstructionSettings = toml::from_str(
            r##"
                should_crop = false
                stroke_color = "#FF0000"
                desired = { size = { width = 30.0, height = 20.0 } }
            "##,
        )
        .unwrap();
        assert!(!settings.should_crop);
        assert_eq!(settings.stroke_color, Some(Color::from_rgba8(255, 0, 0, 255)));
        assert_eq!(
            settings.desired,
            SizeOrScale::Size {
                width: 30.0,
                height: 20.0
            }
        );
        assert_eq!(settings.padding, ImageConstructionSettings::DEFAULT_PADDING);
    }
}
