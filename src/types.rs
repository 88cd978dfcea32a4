use crate::color::brightness;
use serde::{Deserialize, Serialize};

/// Whether a color is a literal RGB value or a theme slot reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKind {
    Rgb,
    Theme,
}

/// A color exactly as found in the template XML.
///
/// `lum_mod`/`lum_off` are only meaningful for [`ColorKind::Theme`]. Their
/// absence is significant: `None` means the element had no such child, which is
/// different from an explicit `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColor {
    pub kind: ColorKind,
    /// `#RRGGBB` for RGB colors, the scheme name (`bg1`, `tx1`, ...) for theme colors.
    pub value: String,
    pub lum_mod: Option<i32>,
    pub lum_off: Option<i32>,
}

impl RawColor {
    pub fn rgb(hex: &str) -> Self {
        Self { kind: ColorKind::Rgb, value: format!("#{}", hex.trim_start_matches('#')), lum_mod: None, lum_off: None }
    }

    pub fn theme(name: &str) -> Self {
        Self { kind: ColorKind::Theme, value: name.to_string(), lum_mod: None, lum_off: None }
    }

    /// Brightness derived from the luminance children, if any were present.
    ///
    /// A lone `lumOff` is paired with the identity modulation (`100000`).
    pub fn brightness(&self) -> Option<f64> {
        if self.kind != ColorKind::Theme || (self.lum_mod.is_none() && self.lum_off.is_none()) {
            return None;
        }
        Some(brightness(self.lum_mod.unwrap_or(100_000), self.lum_off.unwrap_or(0)))
    }
}

/// Fill and outline of one chart series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesStyle {
    pub fill: Option<RawColor>,
    /// `lumMod` of the series outline; the outline hue itself is always `bg1`.
    pub line_lum_mod: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontStyle {
    pub size_pt: Option<f64>,
    pub color: Option<RawColor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisStyle {
    pub visible: bool,
    pub major_tick_mark: Option<String>,
    pub minor_tick_mark: Option<String>,
    pub line_width_emu: Option<i64>,
    pub line_color: Option<RawColor>,
    pub font: Option<FontStyle>,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            visible: true,
            major_tick_mark: None,
            minor_tick_mark: None,
            line_width_emu: None,
            line_color: None,
            font: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataLabelStyle {
    pub show_value: bool,
    /// OOXML position code (`t`, `ctr`, `outEnd`, ...).
    pub position: Option<String>,
    pub number_format: Option<String>,
    pub number_format_linked: Option<bool>,
    pub font_size_pt: Option<f64>,
    pub font_color: Option<RawColor>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendStyle {
    /// OOXML position code (`b`, `t`, `l`, `r`, `tr`).
    pub position: Option<String>,
    pub overlay: Option<bool>,
    pub font_size_pt: Option<f64>,
    pub font_color: Option<RawColor>,
}

/// Styling pulled out of the template artifacts before normalization.
///
/// `series` and `data_labels` are positionally aligned with the rendered chart
/// series: entry *i* styles series *i* (and, for pie charts, point *i*). When a
/// list is shorter than the chart, data labels fall back to entry 0 and pie
/// points beyond the list get a synthesized neutral tint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StylingRecord {
    pub series: Vec<SeriesStyle>,
    pub category_axis: Option<AxisStyle>,
    pub value_axis: Option<AxisStyle>,
    pub data_labels: Vec<DataLabelStyle>,
    pub legend: Option<LegendStyle>,
    pub table_style: TableStyle,
    pub flowchart_style: FlowchartStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBorderStyle {
    /// Literal reference color kept for secondary tooling.
    pub color: String,
    pub color_theme: String,
    pub color_brightness: f64,
    pub width_outer_pt: f64,
    pub width_inner_pt: f64,
}

impl Default for TableBorderStyle {
    fn default() -> Self {
        Self {
            color: "#4F4F70".to_string(),
            color_theme: "accent1".to_string(),
            color_brightness: 0.0,
            width_outer_pt: 1.5,
            width_inner_pt: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableHeaderStyle {
    pub fill_theme: String,
    pub fill_brightness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_rgb: Option<String>,
    pub text_color_theme: String,
    pub text_color_brightness: f64,
    pub font_family: String,
    pub font_size_pt: f64,
    pub font_bold: bool,
    pub font_italic: bool,
    pub font_underline: bool,
    pub margin_left_emu: i64,
    pub margin_right_emu: i64,
    pub margin_top_emu: i64,
    pub margin_bottom_emu: i64,
    pub vertical_align: String,
    pub horizontal_align: String,
}

impl Default for TableHeaderStyle {
    fn default() -> Self {
        Self {
            fill_theme: "bg1".to_string(),
            fill_brightness: -0.5,
            fill_rgb: None,
            text_color_theme: "lt1".to_string(),
            text_color_brightness: 0.0,
            font_family: "Arial".to_string(),
            font_size_pt: 12.0,
            font_bold: true,
            font_italic: false,
            font_underline: false,
            margin_left_emu: 91_440,
            margin_right_emu: 91_440,
            margin_top_emu: 45_720,
            margin_bottom_emu: 45_720,
            vertical_align: "middle".to_string(),
            horizontal_align: "right".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBodyStyle {
    pub fill_theme: String,
    /// Fill brightness per column; columns past the end reuse the last entry.
    pub column_brightness: Vec<f64>,
    pub text_color_theme: String,
    pub text_color_brightness: f64,
    pub font_family: String,
    pub font_size_pt: f64,
    pub font_bold: bool,
    pub font_italic: bool,
    pub font_underline: bool,
    pub margin_left_emu: i64,
    pub margin_right_emu: i64,
    pub margin_top_emu: i64,
    pub margin_bottom_emu: i64,
    pub vertical_align: String,
    pub horizontal_align: String,
}

pub const DEFAULT_BODY_COLUMN_BRIGHTNESS: [f64; 4] = [-0.15, -0.05, -0.05, -0.05];

impl Default for TableBodyStyle {
    fn default() -> Self {
        Self {
            fill_theme: "bg1".to_string(),
            column_brightness: DEFAULT_BODY_COLUMN_BRIGHTNESS.to_vec(),
            text_color_theme: "dk1".to_string(),
            text_color_brightness: 0.0,
            font_family: "Arial".to_string(),
            font_size_pt: 12.0,
            font_bold: false,
            font_italic: false,
            font_underline: false,
            margin_left_emu: 91_440,
            margin_right_emu: 91_440,
            margin_top_emu: 45_720,
            margin_bottom_emu: 45_720,
            vertical_align: "middle".to_string(),
            horizontal_align: "right".to_string(),
        }
    }
}

/// The `table` section of the style document, also the output of table extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub border: TableBorderStyle,
    pub header: TableHeaderStyle,
    pub body: TableBodyStyle,
    pub alignment: String,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            border: TableBorderStyle::default(),
            header: TableHeaderStyle::default(),
            body: TableBodyStyle::default(),
            alignment: "right".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowStyle {
    pub enabled: bool,
    pub blur_pt: f64,
    pub distance_pt: f64,
    pub direction_deg: f64,
    pub opacity: f64,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self { enabled: true, blur_pt: 4.0, distance_pt: 3.0, direction_deg: 45.0, opacity: 0.4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeTextStyle {
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_theme: Option<String>,
    pub font_size_pt: f64,
    pub bold: bool,
}

impl Default for NodeTextStyle {
    fn default() -> Self {
        Self { color: Some("#FFFFFF".to_string()), color_theme: None, font_size_pt: 11.0, bold: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub shape: String,
    pub fill: Option<String>,
    pub fill_theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_brightness: Option<f64>,
    pub border_width_pt: f64,
    pub shadow: ShadowStyle,
    pub text: NodeTextStyle,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            shape: "rounded_rectangle".to_string(),
            fill: Some("#4F4F70".to_string()),
            fill_theme: None,
            fill_brightness: None,
            border_width_pt: 0.0,
            shadow: ShadowStyle::default(),
            text: NodeTextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self { kind: "triangle".to_string(), size: "medium".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorStyle {
    #[serde(rename = "type")]
    pub kind: String,
    pub color_theme: String,
    pub color_brightness: f64,
    pub width_pt: f64,
    pub dash_style: String,
    pub arrow: ArrowStyle,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            kind: "elbow".to_string(),
            color_theme: "bg1".to_string(),
            color_brightness: -0.25,
            width_pt: 1.0,
            dash_style: "dash".to_string(),
            arrow: ArrowStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeLabelStyle {
    pub font_size_pt: f64,
    pub color_theme: String,
    pub color_brightness: f64,
}

impl Default for EdgeLabelStyle {
    fn default() -> Self {
        Self { font_size_pt: 9.0, color_theme: "bg1".to_string(), color_brightness: -0.5 }
    }
}

/// The `flowchart` section of the style document, also the output of flowchart extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowchartStyle {
    pub direction: String,
    pub node: NodeStyle,
    pub connector: ConnectorStyle,
    pub label: EdgeLabelStyle,
}

impl Default for FlowchartStyle {
    fn default() -> Self {
        Self {
            direction: "LR".to_string(),
            node: NodeStyle::default(),
            connector: ConnectorStyle::default(),
            label: EdgeLabelStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
}

fn default_true() -> bool {
    true
}

/// Caller input for [`crate::NativeBuilder::build_table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    #[serde(default)]
    pub data: Vec<Vec<String>>,
    #[serde(default = "default_true")]
    pub header_row: bool,
    #[serde(default)]
    pub column_types: Option<Vec<ColumnType>>,
}

impl TableSpec {
    pub fn new(data: Vec<Vec<String>>) -> Self {
        Self { data, header_row: true, column_types: None }
    }
}

/// A chart value as supplied by the caller; text is accepted if it parses as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Number(f64),
    Text(String),
}

impl SpecValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SpecValue::Number(n) => Some(*n),
            SpecValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for SpecValue {
    fn from(value: f64) -> Self {
        SpecValue::Number(value)
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub values: Vec<SpecValue>,
}

fn default_chart_kind() -> String {
    "line".to_string()
}

/// Caller input for [`crate::NativeBuilder::build_chart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(default = "default_chart_kind")]
    pub chart_kind: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub text: String,
    /// Center of the node relative to the placeholder, `(0..1, 0..1)`.
    #[serde(default)]
    pub position: Option<(f64, f64)>,
    /// Inches.
    #[serde(default)]
    pub width: Option<f64>,
    /// Inches.
    #[serde(default)]
    pub height: Option<f64>,
}

/// Caller input for [`crate::NativeBuilder::build_diagram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSpec {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_color_brightness_presence() {
        let mut color = RawColor::theme("bg1");
        assert_eq!(color.brightness(), None);

        color.lum_mod = Some(75_000);
        assert_eq!(color.brightness(), Some(-0.25));

        let mut text = RawColor::theme("tx1");
        text.lum_off = Some(85_000);
        assert_eq!(text.brightness(), Some(0.85));

        let mut rgb = RawColor::rgb("4F4F70");
        rgb.lum_mod = Some(50_000);
        assert_eq!(rgb.value, "#4F4F70");
        assert_eq!(rgb.brightness(), None);
    }

    #[test]
    fn test_spec_value_numeric() {
        assert_eq!(SpecValue::from(3.5).as_f64(), Some(3.5));
        assert_eq!(SpecValue::from(" 12 ").as_f64(), Some(12.0));
        assert_eq!(SpecValue::from("abc").as_f64(), None);
    }
}
