/// Straight-alpha (not premultiplied) sRGB color, 8 bits per channel.
///
/// Text form is `#RRGGBB` or `#RRGGBBAA`, which is also how it (de)serializes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Color {
    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);
    pub const WHITE: Self = Self::from_rgba8(255, 255, 255, 255);
    pub const BLACK: Self = Self::from_rgba8(0, 0, 0, 255);
    #[must_use]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
impl From<Color> for tiny_skia::Color {
    fn from(value: Color) -> Self {
        tiny_skia::Color::from_rgba8(value.r, value.g, value.b, value.a)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 6 or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error(transparent)]
    Digit(#[from] std::num::ParseIntError),
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim_ascii()
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHash)?;
        // Byte indexing below needs plain ascii, and `len` counts bytes.
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(ColorParseError::BadLength(hex.chars().count()));
        }
        let channel = |idx: usize| u8::from_str_radix(&hex[idx * 2..idx * 2 + 2], 16);

        let a = if hex.len() == 8 { channel(3)? } else { 255 };
        Ok(Self::from_rgba8(channel(0)?, channel(1)?, channel(2)?, a))
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}
impl TryFrom<String> for Color {
    type Error = ColorParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::{Color, ColorParseError};
    #[test]
    fn parse() {
        assert_eq!("#000000".parse(), Ok(Color::BLACK));
        assert_eq!(" #ffffff ".parse(), Ok(Color::WHITE));
        assert_eq!(
            "#1E90FF80".parse(),
            Ok(Color::from_rgba8(0x1E, 0x90, 0xFF, 0x80))
        );
    }
    #[test]
    fn parse_errors() {
        assert_eq!("000000".parse::<Color>(), Err(ColorParseError::MissingHash));
        assert_eq!("#12345".parse::<Color>(), Err(ColorParseError::BadLength(5)));
        assert!(matches!(
            "#GG0000".parse::<Color>(),
            Err(ColorParseError::Digit(_))
        ));
        // Multibyte chars must not slice mid-codepoint.
        assert!("#ééé".parse::<Color>().is_err());
    }
    #[test]
    fn display_round_trip() {
        for color in [
            Color::BLACK,
            Color::TRANSPARENT,
            Color::from_rgba8(1, 2, 3, 4),
        ] {
            assert_eq!(color.to_string().parse(), Ok(color));
        }
        assert_eq!(Color::WHITE.to_string(), "#FFFFFF");
    }
}
