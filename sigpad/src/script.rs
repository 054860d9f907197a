//! Replay scripts: a recorded session of pointer callbacks, and what to export afterwards.
//!
//! ```toml
//! width = 300.0
//! height = 100.0
//! points_out = "sig.toml"
//!
//! [[event]]
//! phase = "begin"
//! x = 10.0
//! y = 50.0
//! [[event]]
//! phase = "move"
//! x = 40.0
//! y = 60.0
//! history = [[20.0, 52.0], [30.0, 57.0]]
//! [[event]]
//! phase = "end"
//! x = 80.0
//! y = 40.0
//!
//! [[export]]
//! path = "sig.png"
//! [export.settings]
//! desired = { scale = 2.0 }
//! ```
//!
//! Relative paths are resolved against the script's own directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sigpad_core::{
    EncodeFormat, ImageConstructionSettings, Phase, Point, PointerEvent, SignatureSurface,
    SurfaceConfig, SurfaceEvent,
};

use crate::settings::Preferences;

/// One pointer callback as the platform delivered it.
#[derive(Clone, PartialEq, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordedEvent {
    pub phase: Phase,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub history: Vec<Point>,
}
impl From<&RecordedEvent> for PointerEvent {
    fn from(value: &RecordedEvent) -> Self {
        PointerEvent::new(value.phase, Point::new(value.x, value.y))
            .with_history(value.history.iter().copied())
    }
}

#[derive(Clone, PartialEq, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportRequest {
    pub path: PathBuf,
    /// Overrides the extension.
    pub format: Option<EncodeFormat>,
    /// Overrides the preferred export settings wholesale.
    pub settings: Option<ImageConstructionSettings>,
}
impl ExportRequest {
    /// Explicit format, else guessed from the extension, else the fallback.
    #[must_use]
    pub fn format_or(&self, fallback: EncodeFormat) -> EncodeFormat {
        self.format
            .or_else(|| EncodeFormat::from_path(&self.path))
            .unwrap_or(fallback)
    }
}

#[derive(Clone, PartialEq, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub width: f32,
    pub height: f32,
    /// Defaults to the preferred surface config.
    pub surface: Option<SurfaceConfig>,
    /// Flattened signature to start from, before any events.
    #[serde(default)]
    pub load_points: Vec<Point>,
    #[serde(default, rename = "event")]
    pub events: Vec<RecordedEvent>,
    #[serde(default, rename = "export")]
    pub exports: Vec<ExportRequest>,
    /// Where to write the resulting flattened point array, as TOML.
    pub points_out: Option<PathBuf>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct PointsFile {
    points: Vec<Point>,
}

/// What a script run did.
#[derive(Debug, Default)]
pub struct Report {
    pub events: Vec<SurfaceEvent>,
    pub written: Vec<PathBuf>,
}

impl Script {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
    /// Build a surface and feed it every recorded event, collecting its notifications.
    #[must_use]
    pub fn replay(&self, preferences: &Preferences) -> (SignatureSurface, Vec<SurfaceEvent>) {
        let config = self.surface.unwrap_or(preferences.surface);
        let mut surface = SignatureSurface::new(self.width, self.height, config);
        let mut listener = surface.subscribe();

        if !self.load_points.is_empty() {
            surface.load_points(&self.load_points);
        }
        for event in &self.events {
            surface.handle(&event.into());
        }

        let events: Vec<_> = std::iter::from_fn(|| listener.try_recv().ok()).collect();
        for event in &events {
            log::debug!("surface: {event:?}");
        }
        (surface, events)
    }
    /// Replay, then write every requested output. `base` anchors relative paths.
    pub async fn run(&self, base: &Path, preferences: &Preferences) -> anyhow::Result<Report> {
        let (surface, events) = self.replay(preferences);
        let mut written = Vec::with_capacity(self.exports.len() + 1);

        if let Some(points_out) = &self.points_out {
            let path = base.join(points_out);
            let file = PointsFile {
                points: surface.points(),
            };
            std::fs::write(&path, toml::to_string(&file)?)
                .with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }

        for request in &self.exports {
            let path = base.join(&request.path);
            let format = request.format_or(preferences.format);
            let settings = request.settings.unwrap_or(preferences.export);
            let Some(bytes) = surface.image_stream(format, &settings).await else {
                log::warn!("nothing to export to {}", path.display());
                continue;
            };
            std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} ({})", path.display(), format.mime_type());
            written.push(path);
        }

        Ok(Report { events, written })
    }
}

/// Read and run the script at `path`.
pub async fn run_path(path: &Path, preferences: &Preferences) -> anyhow::Result<Report> {
    let script = Script::read(path).with_context(|| format!("reading {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    script.run(base, preferences).await
}
