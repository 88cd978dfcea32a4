use crate::color::{brightness_to_lum_mod, RgbColor, ThemeColor};
use crate::constants::OOXML_PERCENT;
use crate::{Error, Result};
use log::warn;

/// The color a [`ColorFormat`] currently resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorValue {
    Rgb(RgbColor),
    Theme(ThemeColor),
}

/// A settable color with a brightness adjustment, as found on fills, lines and fonts.
///
/// Brightness is only meaningful once a color has been chosen, and is kept in
/// `[-1.0, 1.0]`. Choosing a new color resets brightness to `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorFormat {
    value: Option<ColorValue>,
    brightness: f64,
}

impl ColorFormat {
    pub fn value(&self) -> Option<ColorValue> {
        self.value
    }

    pub fn rgb(&self) -> Option<RgbColor> {
        match self.value {
            Some(ColorValue::Rgb(rgb)) => Some(rgb),
            _ => None,
        }
    }

    pub fn theme_color(&self) -> Option<ThemeColor> {
        match self.value {
            Some(ColorValue::Theme(theme)) => Some(theme),
            _ => None,
        }
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn set_rgb(&mut self, rgb: RgbColor) {
        self.value = Some(ColorValue::Rgb(rgb));
        self.brightness = 0.0;
    }

    pub fn set_theme_color(&mut self, theme: ThemeColor) {
        self.value = Some(ColorValue::Theme(theme));
        self.brightness = 0.0;
    }

    /// Sets the brightness adjustment, clamping to `[-1.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] if no color has been chosen yet.
    pub fn set_brightness(&mut self, brightness: f64) -> Result<()> {
        if self.value.is_none() {
            return Err(Error::Unsupported("brightness requires a color to be set first"));
        }
        let clamped = brightness.clamp(-1.0, 1.0);
        if clamped != brightness {
            warn!("Brightness {brightness} out of range, clamped to {clamped}");
        }
        self.brightness = clamped;
        Ok(())
    }

    /// DrawingML color element (`<a:srgbClr>` or `<a:schemeClr>`), or an empty
    /// string when no color is set.
    ///
    /// Darkening is written as a single `lumMod`; lightening as the
    /// `lumMod`/`lumOff` pair PowerPoint itself writes.
    pub fn to_xml(&self) -> String {
        let (tag, val) = match self.value {
            Some(ColorValue::Rgb(rgb)) => ("srgbClr", rgb.to_string()),
            Some(ColorValue::Theme(theme)) => ("schemeClr", theme.as_str().to_string()),
            None => return String::new(),
        };

        let mut xml = format!("<a:{tag} val=\"{val}\"");
        if self.brightness < 0.0 {
            xml.push_str(&format!("><a:lumMod val=\"{}\"/></a:{tag}>", brightness_to_lum_mod(self.brightness)));
        } else if self.brightness > 0.0 {
            let lum_off = (self.brightness * OOXML_PERCENT).round() as i32;
            xml.push_str(&format!(
                "><a:lumMod val=\"{}\"/><a:lumOff val=\"{lum_off}\"/></a:{tag}>",
                OOXML_PERCENT as i32 - lum_off
            ));
        } else {
            xml.push_str("/>");
        }
        xml
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillType {
    /// Inherited from the theme or layout.
    #[default]
    Inherit,
    NoFill,
    Solid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillFormat {
    fill_type: FillType,
    fore_color: ColorFormat,
}

impl FillFormat {
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    pub fn solid(&mut self) {
        self.fill_type = FillType::Solid;
    }

    /// Makes the fill transparent.
    pub fn background(&mut self) {
        self.fill_type = FillType::NoFill;
    }

    pub fn fore_color(&self) -> &ColorFormat {
        &self.fore_color
    }

    /// # Errors
    ///
    /// [`Error::Unsupported`] unless [`FillFormat::solid`] was called first.
    pub fn fore_color_mut(&mut self) -> Result<&mut ColorFormat> {
        match self.fill_type {
            FillType::Solid => Ok(&mut self.fore_color),
            _ => Err(Error::Unsupported("fore color requires a solid fill")),
        }
    }

    pub fn to_xml(&self) -> String {
        match self.fill_type {
            FillType::Inherit => String::new(),
            FillType::NoFill => "<a:noFill/>".to_string(),
            FillType::Solid => format!("<a:solidFill>{}</a:solidFill>", self.fore_color.to_xml()),
        }
    }
}

/// Preset dash patterns (`<a:prstDash val=".."/>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashStyle {
    Solid,
    Dash,
    Dot,
    DashDot,
    LongDash,
}

impl DashStyle {
    /// Style document names (`solid`, `dash`, `dot`, ...); unknown names are dashed.
    pub fn from_name(name: &str) -> DashStyle {
        match name {
            "solid" => DashStyle::Solid,
            "dot" => DashStyle::Dot,
            "dash_dot" => DashStyle::DashDot,
            "long_dash" => DashStyle::LongDash,
            _ => DashStyle::Dash,
        }
    }

    pub fn as_ooxml(&self) -> &'static str {
        match self {
            DashStyle::Solid => "solid",
            DashStyle::Dash => "dash",
            DashStyle::Dot => "sysDot",
            DashStyle::DashDot => "dashDot",
            DashStyle::LongDash => "lgDash",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineFormat {
    pub fill: FillFormat,
    pub width_emu: Option<i64>,
    pub dash_style: Option<DashStyle>,
}

impl LineFormat {
    /// Line color; accessing it makes the line solid.
    pub fn color_mut(&mut self) -> &mut ColorFormat {
        self.fill.solid();
        &mut self.fill.fore_color
    }

    pub fn color(&self) -> &ColorFormat {
        self.fill.fore_color()
    }

    /// `<a:{tag} w="..">..</a:{tag}>`, e.g. `tag = "ln"` or `"lnL"`.
    pub fn to_xml(&self, tag: &str) -> String {
        let mut xml = format!("<a:{tag}");
        if let Some(width) = self.width_emu {
            xml.push_str(&format!(" w=\"{width}\""));
        }
        xml.push('>');
        xml.push_str(&self.fill.to_xml());
        if let Some(dash) = self.dash_style {
            xml.push_str(&format!("<a:prstDash val=\"{}\"/>", dash.as_ooxml()));
        }
        xml.push_str(&format!("</a:{tag}>"));
        xml
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Font {
    pub name: Option<String>,
    pub size_pt: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: ColorFormat,
}

impl Font {
    /// `<a:rPr ..>` for a run carrying this font.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<a:rPr lang=\"ja-JP\"");
        if let Some(size) = self.size_pt {
            xml.push_str(&format!(" sz=\"{}\"", (size * 100.0).round() as i64));
        }
        for (attr, value) in [("b", self.bold), ("i", self.italic)] {
            if let Some(on) = value {
                xml.push_str(&format!(" {attr}=\"{}\"", u8::from(on)));
            }
        }
        if let Some(underline) = self.underline {
            xml.push_str(if underline { " u=\"sng\"" } else { " u=\"none\"" });
        }
        xml.push('>');

        let color = self.color.to_xml();
        if !color.is_empty() {
            xml.push_str(&format!("<a:solidFill>{color}</a:solidFill>"));
        }
        if let Some(name) = &self.name {
            xml.push_str(&format!("<a:latin typeface=\"{}\"/>", quick_xml::escape::escape(name.as_str())));
        }
        xml.push_str("</a:rPr>");
        xml
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl VerticalAnchor {
    /// `top`, `middle` or `bottom`; anything else is `middle`.
    pub fn from_name_or_default(name: &str) -> VerticalAnchor {
        match name {
            "top" => VerticalAnchor::Top,
            "bottom" => VerticalAnchor::Bottom,
            _ => VerticalAnchor::Middle,
        }
    }

    pub fn as_ooxml(&self) -> &'static str {
        match self {
            VerticalAnchor::Top => "t",
            VerticalAnchor::Middle => "ctr",
            VerticalAnchor::Bottom => "b",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl HorizontalAlign {
    /// `left`, `center`, `right` or `justify`; anything else is `right`,
    /// which suits the numeric tables these styles are written for.
    pub fn from_name_or_default(name: &str) -> HorizontalAlign {
        match name {
            "left" => HorizontalAlign::Left,
            "center" => HorizontalAlign::Center,
            "justify" => HorizontalAlign::Justify,
            _ => HorizontalAlign::Right,
        }
    }

    pub fn as_ooxml(&self) -> &'static str {
        match self {
            HorizontalAlign::Left => "l",
            HorizontalAlign::Center => "ctr",
            HorizontalAlign::Right => "r",
            HorizontalAlign::Justify => "just",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_requires_color() {
        let mut color = ColorFormat::default();
        assert!(matches!(color.set_brightness(-0.25), Err(Error::Unsupported(_))));

        color.set_theme_color(ThemeColor::Background1);
        color.set_brightness(-0.25).unwrap();
        assert_eq!(color.brightness(), -0.25);
    }

    #[test]
    fn test_brightness_is_clamped() {
        let mut color = ColorFormat::default();
        color.set_theme_color(ThemeColor::Text1);
        color.set_brightness(1.7).unwrap();
        assert_eq!(color.brightness(), 1.0);
        color.set_brightness(-3.0).unwrap();
        assert_eq!(color.brightness(), -1.0);
    }

    #[test]
    fn test_new_color_resets_brightness() {
        let mut color = ColorFormat::default();
        color.set_theme_color(ThemeColor::Accent1);
        color.set_brightness(-0.5).unwrap();
        color.set_rgb(RgbColor::new(0x4F, 0x4F, 0x70));
        assert_eq!(color.brightness(), 0.0);
        assert_eq!(color.theme_color(), None);
    }

    #[test]
    fn test_color_xml() {
        let mut color = ColorFormat::default();
        assert_eq!(color.to_xml(), "");

        color.set_theme_color(ThemeColor::Background1);
        color.set_brightness(-0.25).unwrap();
        assert_eq!(color.to_xml(), r#"<a:schemeClr val="bg1"><a:lumMod val="75000"/></a:schemeClr>"#);

        color.set_theme_color(ThemeColor::Text1);
        color.set_brightness(0.35).unwrap();
        assert_eq!(
            color.to_xml(),
            r#"<a:schemeClr val="tx1"><a:lumMod val="65000"/><a:lumOff val="35000"/></a:schemeClr>"#
        );

        color.set_rgb(RgbColor::new(0x4F, 0x4F, 0x70));
        assert_eq!(color.to_xml(), r#"<a:srgbClr val="4F4F70"/>"#);
    }

    #[test]
    fn test_fore_color_requires_solid_fill() {
        let mut fill = FillFormat::default();
        assert!(fill.fore_color_mut().is_err());
        fill.solid();
        fill.fore_color_mut().unwrap().set_theme_color(ThemeColor::Accent2);
        assert_eq!(fill.to_xml(), r#"<a:solidFill><a:schemeClr val="accent2"/></a:solidFill>"#);
    }

    #[test]
    fn test_line_color_makes_line_solid() {
        let mut line = LineFormat { width_emu: Some(12_700), ..LineFormat::default() };
        line.color_mut().set_theme_color(ThemeColor::Background1);
        assert_eq!(line.fill.fill_type(), FillType::Solid);
        assert_eq!(line.to_xml("lnL"), r#"<a:lnL w="12700"><a:solidFill><a:schemeClr val="bg1"/></a:solidFill></a:lnL>"#);
    }

    #[test]
    fn test_alignment_names() {
        assert_eq!(VerticalAnchor::from_name_or_default("bottom"), VerticalAnchor::Bottom);
        assert_eq!(VerticalAnchor::from_name_or_default("???"), VerticalAnchor::Middle);
        assert_eq!(HorizontalAlign::from_name_or_default("center").as_ooxml(), "ctr");
        assert_eq!(HorizontalAlign::from_name_or_default(""), HorizontalAlign::Right);
    }
}
