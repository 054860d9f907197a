//! User preferences, stored as TOML in the platform's preference directory.

use sigpad_core::{EncodeFormat, ImageConstructionSettings, SurfaceConfig};

const DOCUMENTATION: &str = r##"# Sigpad settings. You may edit this file, but be aware that formatting and comments will not
# be preserved.

# [surface] sets the pen for newly drawn strokes. Colors are "#RRGGBB" or "#RRGGBBAA".
# [surface.capture] controls sampling: `min_movement` drops samples closer than this to the last
# recorded one, `granularity` is the number of smoothed segments between two samples.
# [export] holds defaults for exports that don't specify their own settings.

# Examples:
# [surface]
# stroke_color = "#1E2A78"
# stroke_width = 3.0
# [export]
# should_crop = true
# padding = 10.0
# desired = { scale = 2.0 }

"##;

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Used when an export path has no recognizable extension.
    pub format: EncodeFormat,
    pub surface: SurfaceConfig,
    pub export: ImageConstructionSettings,
}
impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: EncodeFormat::Png,
            surface: SurfaceConfig::default(),
            export: ImageConstructionSettings::default(),
        }
    }
}

impl Preferences {
    /// Pretty TOML, preceded by a commented guide to the file.
    pub fn to_documented_toml(&self) -> Result<String, toml::ser::Error> {
        let body = toml::ser::to_string_pretty(self)?;
        Ok(format!("{DOCUMENTATION}{body}"))
    }
}

/// `<preference_dir>/sigpad`, if the platform has a preference dir at all.
#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    dirs::preference_dir().map(|base| base.join(env!("CARGO_PKG_NAME")))
}

/// Preferences as loaded at startup.
pub struct Settings {
    /// Whether `preferences` came from the user's file rather than defaults.
    from_file: bool,
    pub preferences: Preferences,
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";
    #[must_use]
    fn path() -> Option<std::path::PathBuf> {
        preferences_dir().map(|dir| dir.join(Self::FILENAME))
    }
    /// Loaded once from the user's settings file, defaulted if missing or malformed.
    #[must_use]
    pub fn get() -> &'static Self {
        static SETTINGS: std::sync::OnceLock<Settings> = std::sync::OnceLock::new();
        SETTINGS.get_or_init(|| {
            let loaded = Self::path().map(|path| (Self::read(&path), path));
            match loaded {
                Some((Ok(preferences), _)) => Self {
                    from_file: true,
                    preferences,
                },
                Some((Err(e), path)) => {
                    log::warn!("using default settings, couldn't load {}: {e:#}", path.display());
                    Self::defaulted()
                }
                None => {
                    log::warn!("no preference directory, using default settings");
                    Self::defaulted()
                }
            }
        })
    }
    #[must_use]
    pub fn defaulted() -> Self {
        Self {
            from_file: false,
            preferences: Preferences::default(),
        }
    }
    fn read(path: &std::path::Path) -> anyhow::Result<Preferences> {
        try_block::try_block! {
            let text = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&text)?)
        }
    }
    /// True if defaults are in use because the user's file couldn't be read.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        !self.from_file
    }
    /// Write the preferences back, with documentation, so the user has something to edit.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = preferences_dir().ok_or_else(|| anyhow::anyhow!("no preference directory"))?;
        // Only the last component is created, a missing parent is left alone.
        if let Err(e) = std::fs::create_dir(&dir) {
            if e.kind() != std::io::ErrorKind::AlreadyExists {
                return Err(e.into());
            }
        }
        let text = self.preferences.to_documented_toml()?;
        std::fs::write(dir.join(Self::FILENAME), text)?;
        Ok(())
    }
}
