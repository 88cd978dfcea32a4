use crate::constants::OOXML_PERCENT;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Converts an OOXML `lumMod`/`lumOff` pair into a brightness scalar.
///
/// A positive `lum_off` lightens a dark base color additively, so the brightness
/// is the offset itself (`15000`/`85000` gives `0.85`). Without an offset the
/// modulation darkens a light base color multiplicatively (`75000` gives `-0.25`).
///
/// The result is not clamped. `brightness(0, 0)` is `-1.0`.
///
/// # Example
///
/// ```
/// use pptx_style::brightness;
///
/// assert_eq!(brightness(75_000, 0), -0.25);
/// assert_eq!(brightness(15_000, 85_000), 0.85);
/// ```
pub fn brightness(lum_mod: i32, lum_off: i32) -> f64 {
    if lum_off > 0 {
        f64::from(lum_off) / OOXML_PERCENT
    } else {
        f64::from(lum_mod) / OOXML_PERCENT - 1.0
    }
}

/// Inverse of [`brightness`] for the darkening case: the `lumMod` value that
/// produces `brightness` on a light base color.
pub fn brightness_to_lum_mod(brightness: f64) -> i32 {
    ((1.0 + brightness) * OOXML_PERCENT).round() as i32
}

/// A DrawingML scheme color slot (`<a:schemeClr val="..."/>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeColor {
    Text1,
    Text2,
    Background1,
    Background2,
    Dark1,
    Dark2,
    Light1,
    Light2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hyperlink,
    FollowedHyperlink,
}

impl ThemeColor {
    pub const ALL: [ThemeColor; 16] = [
        ThemeColor::Text1,
        ThemeColor::Text2,
        ThemeColor::Background1,
        ThemeColor::Background2,
        ThemeColor::Dark1,
        ThemeColor::Dark2,
        ThemeColor::Light1,
        ThemeColor::Light2,
        ThemeColor::Accent1,
        ThemeColor::Accent2,
        ThemeColor::Accent3,
        ThemeColor::Accent4,
        ThemeColor::Accent5,
        ThemeColor::Accent6,
        ThemeColor::Hyperlink,
        ThemeColor::FollowedHyperlink,
    ];

    /// The OOXML short name (`tx1`, `bg1`, `accent1`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeColor::Text1 => "tx1",
            ThemeColor::Text2 => "tx2",
            ThemeColor::Background1 => "bg1",
            ThemeColor::Background2 => "bg2",
            ThemeColor::Dark1 => "dk1",
            ThemeColor::Dark2 => "dk2",
            ThemeColor::Light1 => "lt1",
            ThemeColor::Light2 => "lt2",
            ThemeColor::Accent1 => "accent1",
            ThemeColor::Accent2 => "accent2",
            ThemeColor::Accent3 => "accent3",
            ThemeColor::Accent4 => "accent4",
            ThemeColor::Accent5 => "accent5",
            ThemeColor::Accent6 => "accent6",
            ThemeColor::Hyperlink => "hlink",
            ThemeColor::FollowedHyperlink => "folHlink",
        }
    }

    /// Lenient lookup used by the config facade: unknown names map to `bg1`.
    pub fn from_name_or_default(name: &str) -> ThemeColor {
        name.parse().unwrap_or(ThemeColor::Background1)
    }
}

impl FromStr for ThemeColor {
    type Err = Error;

    /// Accepts the OOXML short names plus the upper-case enum spellings some
    /// hand-edited style files use (`ACCENT_1`, `LIGHT_1`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let theme = match s {
            "tx1" | "TEXT_1" => ThemeColor::Text1,
            "tx2" | "TEXT_2" => ThemeColor::Text2,
            "bg1" | "BACKGROUND_1" => ThemeColor::Background1,
            "bg2" | "BACKGROUND_2" => ThemeColor::Background2,
            "dk1" | "DARK_1" => ThemeColor::Dark1,
            "dk2" | "DARK_2" => ThemeColor::Dark2,
            "lt1" | "LIGHT_1" => ThemeColor::Light1,
            "lt2" | "LIGHT_2" => ThemeColor::Light2,
            "accent1" | "ACCENT_1" => ThemeColor::Accent1,
            "accent2" | "ACCENT_2" => ThemeColor::Accent2,
            "accent3" | "ACCENT_3" => ThemeColor::Accent3,
            "accent4" | "ACCENT_4" => ThemeColor::Accent4,
            "accent5" | "ACCENT_5" => ThemeColor::Accent5,
            "accent6" | "ACCENT_6" => ThemeColor::Accent6,
            "hlink" | "HYPERLINK" => ThemeColor::Hyperlink,
            "folHlink" | "FOLLOWED_HYPERLINK" => ThemeColor::FollowedHyperlink,
            _ => return Err(Error::UnknownThemeColor(s.to_string())),
        };
        Ok(theme)
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
        };
        Ok(Self { r: channel(0..2)?, g: channel(2..4)?, b: channel(4..6)? })
    }

    /// `#RRGGBB`, upper case.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_wins_over_modulation() {
        for lum_mod in [0, 15_000, 50_000, 100_000] {
            assert_eq!(brightness(lum_mod, 85_000), 0.85);
        }
        assert_eq!(brightness(15_000, 85_000), 0.85);
    }

    #[test]
    fn test_modulation_only() {
        assert_eq!(brightness(75_000, 0), -0.25);
        assert_eq!(brightness(100_000, 0), 0.0);
        assert_eq!(brightness(50_000, 0), -0.5);
    }

    #[test]
    fn test_no_modifiers_baseline() {
        assert_eq!(brightness(0, 0), -1.0);
    }

    #[test]
    fn test_brightness_to_lum_mod() {
        assert_eq!(brightness_to_lum_mod(-0.25), 75_000);
        assert_eq!(brightness_to_lum_mod(0.0), 100_000);
        assert_eq!(brightness(brightness_to_lum_mod(-0.5), 0), -0.5);
    }

    #[test]
    fn test_theme_color_names() {
        for theme in ThemeColor::ALL {
            assert_eq!(theme.as_str().parse::<ThemeColor>().unwrap(), theme);
        }
        assert_eq!("ACCENT_1".parse::<ThemeColor>().unwrap(), ThemeColor::Accent1);
        assert!(matches!("purple".parse::<ThemeColor>(), Err(Error::UnknownThemeColor(_))));
        assert_eq!(ThemeColor::from_name_or_default("purple"), ThemeColor::Background1);
    }

    #[test]
    fn test_rgb_hex() {
        let rgb = RgbColor::from_hex("#4F4F70").unwrap();
        assert_eq!(rgb, RgbColor::new(0x4F, 0x4F, 0x70));
        assert_eq!(rgb.to_hex(), "#4F4F70");
        assert_eq!(RgbColor::from_hex("ffffff").unwrap(), RgbColor::new(255, 255, 255));
        assert!(RgbColor::from_hex("#12345").is_err());
        assert!(RgbColor::from_hex("zzzzzz").is_err());
    }
}
