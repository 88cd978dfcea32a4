//! The canonical style document (`style.yaml`).
//!
//! Every section and field carries a default, so partial or hand-edited files
//! load without errors. Colors are stored as [`ColorSpec`] with a precomputed
//! brightness; raw `lumMod`/`lumOff` values never reach this layer.

use crate::chart::LegendPosition;
use crate::types::{ColorKind, FlowchartStyle, RawColor, StylingRecord, TableStyle};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PRIMARY: &str = "#4F4F70";

const GENERATED_HEADER: &str = "\
# Generated from a chart template (.crtx) and a reference deck (.pptx).
# Regenerate instead of editing: cargo run --example extract_style -- <crtx> <pptx> <output>
#
# Sources:
#   - chart template: series colors, axes, legend, data labels
#   - reference deck slide 1: table styling
#   - reference deck slide 2: flowchart and diagram styling

";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    Rgb,
    #[default]
    Theme,
}

/// `{type, value, brightness}`: an RGB hex value or a theme slot name, with the
/// brightness already derived from the template's luminance modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSpec {
    #[serde(rename = "type")]
    pub kind: ColorType,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::theme("tx1", None)
    }
}

impl ColorSpec {
    pub fn theme(value: &str, brightness: Option<f64>) -> Self {
        Self { kind: ColorType::Theme, value: value.to_string(), brightness }
    }

    pub fn rgb(value: &str) -> Self {
        Self { kind: ColorType::Rgb, value: value.to_string(), brightness: None }
    }
}

impl From<&RawColor> for ColorSpec {
    fn from(raw: &RawColor) -> Self {
        match raw.kind {
            ColorKind::Rgb => ColorSpec::rgb(&raw.value),
            ColorKind::Theme => ColorSpec::theme(&raw.value, raw.brightness()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsSection {
    pub primary: String,
    pub series: Vec<ColorSpec>,
}

impl Default for ColorsSection {
    fn default() -> Self {
        Self { primary: DEFAULT_PRIMARY.to_string(), series: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLineSpec {
    pub width_pt: f64,
    pub color: ColorSpec,
}

impl Default for AxisLineSpec {
    fn default() -> Self {
        Self { width_pt: 0.75, color: ColorSpec::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub size_pt: f64,
    pub color: ColorSpec,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self { size_pt: 11.0, color: ColorSpec::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSection {
    pub visible: bool,
    pub tick_marks: String,
    pub minor_tick_marks: String,
    pub line: AxisLineSpec,
    pub font: FontSpec,
}

impl Default for AxisSection {
    fn default() -> Self {
        Self {
            visible: true,
            tick_marks: "none".to_string(),
            minor_tick_marks: "none".to_string(),
            line: AxisLineSpec::default(),
            font: FontSpec::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendSection {
    /// `bottom`, `top`, `right`, `left` or `corner`.
    pub position: String,
    pub overlay: bool,
    pub font: FontSpec,
}

impl Default for LegendSection {
    fn default() -> Self {
        Self { position: "bottom".to_string(), overlay: false, font: FontSpec::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridlinesSection {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLabelSpec {
    pub show_value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format_linked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<ColorSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MermaidTheme {
    pub primary: String,
    pub primary_text: String,
    pub secondary: String,
    pub secondary_text: String,
    pub line_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: String,
}

impl MermaidTheme {
    fn with_primary(primary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            primary_text: "#FFFFFF".to_string(),
            secondary: "#BFBFBF".to_string(),
            secondary_text: "#000000".to_string(),
            line_color: primary.to_string(),
            text_color: "#000000".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: "14px".to_string(),
        }
    }
}

impl Default for MermaidTheme {
    fn default() -> Self {
        Self::with_primary(DEFAULT_PRIMARY)
    }
}

/// Rendering defaults for tooling that turns diagram text into images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MermaidSection {
    pub direction: String,
    pub format: String,
    pub scale: u32,
    pub background: String,
    pub theme: MermaidTheme,
}

impl MermaidSection {
    fn with_primary(primary: &str) -> Self {
        Self {
            direction: "LR".to_string(),
            format: "svg".to_string(),
            scale: 3,
            background: "transparent".to_string(),
            theme: MermaidTheme::with_primary(primary),
        }
    }
}

impl Default for MermaidSection {
    fn default() -> Self {
        Self::with_primary(DEFAULT_PRIMARY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramNodeStyle {
    pub fill: String,
    pub text_color_theme: String,
    pub border_color: String,
    pub border_width_pt: f64,
    pub font_size_pt: f64,
    pub font_bold: bool,
}

impl DiagramNodeStyle {
    fn with_primary(primary: &str) -> Self {
        Self {
            fill: primary.to_string(),
            text_color_theme: "lt1".to_string(),
            border_color: primary.to_string(),
            border_width_pt: 1.0,
            font_size_pt: 12.0,
            font_bold: false,
        }
    }
}

impl Default for DiagramNodeStyle {
    fn default() -> Self {
        Self::with_primary(DEFAULT_PRIMARY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSection {
    pub node: DiagramNodeStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDocument {
    pub colors: ColorsSection,
    pub category_axis: AxisSection,
    pub value_axis: AxisSection,
    pub legend: LegendSection,
    pub gridlines: GridlinesSection,
    pub data_labels: Vec<DataLabelSpec>,
    pub table: TableStyle,
    pub flowchart: FlowchartStyle,
    pub mermaid: MermaidSection,
    pub diagram: DiagramSection,
}

impl StyleDocument {
    /// Serializes the document as YAML, prefixed with the generated-file header.
    pub fn to_yaml(&self) -> Result<String> {
        let body = serde_saphyr::to_string(self).map_err(|e| Error::Yaml(e.to_string()))?;
        Ok(format!("{GENERATED_HEADER}{body}"))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Parses a YAML document. A file with no content (only comments) yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let has_content = yaml.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#') && line != "---"
        });
        if !has_content {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(yaml).map_err(|e| Error::Yaml(e.to_string()))
    }
}

/// Builds the canonical document from extracted template styling.
///
/// This is the single place where `lumMod`/`lumOff` turn into brightness. The
/// mermaid and diagram sections are derived from the primary color, which is
/// the first series color when that one is RGB.
pub fn serialize(record: &StylingRecord) -> StyleDocument {
    let primary = record
        .series
        .first()
        .and_then(|series| series.fill.as_ref())
        .filter(|fill| fill.kind == ColorKind::Rgb)
        .map(|fill| fill.value.to_uppercase())
        .unwrap_or_else(|| DEFAULT_PRIMARY.to_string());

    let series = record
        .series
        .iter()
        .map(|series| series.fill.as_ref().map(ColorSpec::from).unwrap_or_else(|| ColorSpec::theme("bg1", None)))
        .collect();

    let mut document = StyleDocument {
        colors: ColorsSection { primary: primary.clone(), series },
        table: record.table_style.clone(),
        flowchart: record.flowchart_style.clone(),
        mermaid: MermaidSection::with_primary(&primary),
        diagram: DiagramSection { node: DiagramNodeStyle::with_primary(&primary) },
        ..StyleDocument::default()
    };

    if let Some(axis) = &record.category_axis {
        document.category_axis = axis_section(axis);
    }
    if let Some(axis) = &record.value_axis {
        document.value_axis = axis_section(axis);
    }

    if let Some(legend) = &record.legend {
        let code = legend.position.as_deref().unwrap_or("b");
        let position = LegendPosition::from_code(code).map(|p| p.as_name().to_string()).unwrap_or_else(|| code.to_string());
        let defaults = FontSpec::default();
        document.legend = LegendSection {
            position,
            overlay: legend.overlay.unwrap_or(false),
            font: FontSpec {
                size_pt: legend.font_size_pt.unwrap_or(defaults.size_pt),
                color: legend.font_color.as_ref().map(ColorSpec::from).unwrap_or(defaults.color),
            },
        };
    }

    document.data_labels = record
        .data_labels
        .iter()
        .map(|labels| DataLabelSpec {
            show_value: labels.show_value,
            position: labels.position.clone(),
            number_format: labels.number_format.clone(),
            number_format_linked: labels.number_format_linked,
            font_size_pt: labels.font_size_pt,
            font_color: labels.font_color.as_ref().map(ColorSpec::from),
        })
        .collect();

    document
}

fn axis_section(axis: &crate::types::AxisStyle) -> AxisSection {
    let defaults = AxisSection::default();
    let mut section = AxisSection {
        visible: axis.visible,
        tick_marks: axis.major_tick_mark.clone().unwrap_or(defaults.tick_marks),
        minor_tick_marks: axis.minor_tick_mark.clone().unwrap_or(defaults.minor_tick_marks),
        ..AxisSection::default()
    };

    if let Some(width) = axis.line_width_emu {
        section.line.width_pt = width as f64 / crate::constants::EMU_PER_POINT as f64;
    }
    if let Some(color) = &axis.line_color {
        section.line.color = color.into();
    }
    if let Some(font) = &axis.font {
        if let Some(size) = font.size_pt {
            section.font.size_pt = size;
        }
        if let Some(color) = &font.color {
            section.font.color = color.into();
        }
    }
    section
}
