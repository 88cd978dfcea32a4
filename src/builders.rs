//! Native table, chart and diagram builders.
//!
//! Each builder validates its input before touching the slide, then converts the
//! target placeholder in place when its kind allows it, or adds a new shape at
//! the placeholder's geometry and removes the placeholder afterwards.

use crate::applier::apply_chart_styling;
use crate::chart::{Chart, ChartKind, Series};
use crate::color::{RgbColor, ThemeColor};
use crate::config::StyleConfig;
use crate::constants::{EMU_PER_INCH, EMU_PER_POINT};
use crate::crtx::extract_crtx_styling;
use crate::format::{ColorFormat, HorizontalAlign, VerticalAnchor};
use crate::parser_config::ExtractConfig;
use crate::slide::{AutoShape, Rect, ShapeId, Slide};
use crate::snapshot::ensure_generation_snapshot;
use crate::table::{Border, Cell, CellBorders};
use crate::types::{ChartSpec, ColumnType, DiagramSpec, StylingRecord, TableBodyStyle, TableHeaderStyle, TableSpec};
use crate::{Error, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const NUMBER_DECORATIONS: [char; 5] = [',', '¥', '%', '万', '円'];
const DEFAULT_NODE_WIDTH_IN: f64 = 2.0;
const DEFAULT_NODE_HEIGHT_IN: f64 = 1.0;

/// Builds styled native shapes from plain specs.
///
/// # Example
///
/// ```no_run
/// use pptx_style::{NativeBuilder, PlaceholderKind, Rect, Slide, StyleConfig, TableSpec};
/// use std::path::Path;
///
/// let builder = NativeBuilder::new(StyleConfig::load()?)
///     .with_chart_template(Path::new("templates/template.crtx"))?;
///
/// let mut slide = Slide::new();
/// let body = slide.add_placeholder(PlaceholderKind::Object, 1, Rect::from_inches(0.5, 1.5, 9.0, 5.0));
/// let data = vec![vec!["Region".to_string(), "Sales".to_string()], vec!["East".to_string(), "1200万".to_string()]];
/// builder.build_table(&mut slide, body, &TableSpec::new(data))?;
/// # Ok::<(), pptx_style::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct NativeBuilder {
    config: Arc<StyleConfig>,
    chart_styling: Option<Arc<StylingRecord>>,
    snapshot_dirs: Option<(PathBuf, PathBuf)>,
}

impl NativeBuilder {
    pub fn new(config: Arc<StyleConfig>) -> Self {
        Self { config, chart_styling: None, snapshot_dirs: None }
    }

    /// Reads chart styling from a `.crtx` chart template. Charts cannot be built without it.
    pub fn with_chart_template(self, crtx_path: &Path) -> Result<Self> {
        debug!("Loading chart template from {}", crtx_path.display());
        let styling = extract_crtx_styling(crtx_path, &ExtractConfig::default())?;
        Ok(self.with_chart_styling(styling))
    }

    /// Uses an already extracted chart styling record.
    pub fn with_chart_styling(mut self, styling: StylingRecord) -> Self {
        self.chart_styling = Some(Arc::new(styling));
        self
    }

    /// Enables the once-per-process audit snapshot of `master_dir` into `project_dir`,
    /// taken on the first table or chart build.
    pub fn with_snapshot(mut self, project_dir: impl Into<PathBuf>, master_dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dirs = Some((project_dir.into(), master_dir.into()));
        self
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    fn ensure_snapshot(&self) {
        if let Some((project_dir, master_dir)) = &self.snapshot_dirs {
            ensure_generation_snapshot(project_dir, master_dir);
        }
    }

    /// Builds a styled table in place of `placeholder`.
    ///
    /// Row 0 uses the header style when `spec.header_row` is set. Numeric columns
    /// (from `spec.column_types`, or detected from the first data row) are
    /// rendered with thousands separators, keeping any unit suffix.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an empty or ragged grid, before the slide is changed.
    pub fn build_table(&self, slide: &mut Slide, placeholder: ShapeId, spec: &TableSpec) -> Result<ShapeId> {
        info!("Creating styled table");

        let rows = spec.data.len();
        let cols = spec.data.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(invalid("Table data must be a non-empty 2D array".to_string()));
        }
        if let Some((row, cells)) = spec.data.iter().enumerate().find(|(_, cells)| cells.len() != cols) {
            return Err(invalid(format!(
                "All rows must have the same number of columns (expected {cols}, row {row} has {})",
                cells.len()
            )));
        }
        let target = slide.shape(placeholder).ok_or(Error::ShapeNotFound(placeholder))?;
        let rect = target.rect;
        let convertible = target.placeholder().is_some_and(|ph| ph.kind.accepts_table());
        debug!("Table validated: {rows} rows x {cols} columns");
        self.ensure_snapshot();

        let column_types = match &spec.column_types {
            Some(types) => types.clone(),
            None => detect_column_types(&spec.data, spec.header_row),
        };

        let mut placeholder_consumed = false;
        let table_id = if convertible {
            placeholder_consumed = true;
            slide.insert_table(placeholder, rows, cols)?
        } else {
            slide.add_table(rows, cols, rect)
        };

        let style = &self.config.document().table;
        let border_theme = style.border.color_theme.parse().unwrap_or(ThemeColor::Accent1);
        let table = slide.table_mut(table_id)?;
        for ((row, col), cell) in table.cells_mut() {
            let is_header = spec.header_row && row == 0;
            let text = &spec.data[row][col];
            cell.text = if !is_header && column_types.get(col) == Some(&ColumnType::Number) {
                format_number_text(text)
            } else {
                text.clone()
            };

            if is_header {
                self.style_header_cell(cell, &style.header)?;
            } else {
                self.style_body_cell(cell, &style.body, col)?;
            }

            let side = |outer: bool| -> Result<Border> {
                let width_pt = if outer { style.border.width_outer_pt } else { style.border.width_inner_pt };
                let mut color = ColorFormat::default();
                color.set_theme_color(border_theme);
                color.set_brightness(style.border.color_brightness)?;
                Ok(Border { width_emu: (width_pt * EMU_PER_POINT as f64).round() as i64, color })
            };
            cell.borders = CellBorders {
                left: Some(side(col == 0)?),
                right: Some(side(col + 1 == cols)?),
                top: Some(side(row == 0)?),
                bottom: Some(side(row + 1 == rows)?),
            };
        }

        if !placeholder_consumed {
            remove_placeholder(slide, placeholder);
        }
        Ok(table_id)
    }

    fn style_header_cell(&self, cell: &mut Cell, header: &TableHeaderStyle) -> Result<()> {
        cell.fill.solid();
        let fill = cell.fill.fore_color_mut()?;
        match header.fill_rgb.as_deref().map(RgbColor::from_hex) {
            Some(Ok(rgb)) => fill.set_rgb(rgb),
            _ => {
                fill.set_theme_color(StyleConfig::theme_color(&header.fill_theme));
                fill.set_brightness(header.fill_brightness)?;
            }
        }

        cell.margin_left_emu = header.margin_left_emu;
        cell.margin_right_emu = header.margin_right_emu;
        cell.margin_top_emu = header.margin_top_emu;
        cell.margin_bottom_emu = header.margin_bottom_emu;
        cell.vertical_anchor = VerticalAnchor::from_name_or_default(&header.vertical_align);
        cell.horizontal_align = HorizontalAlign::from_name_or_default(&header.horizontal_align);

        let font = &mut cell.font;
        font.name = Some(header.font_family.clone());
        font.size_pt = Some(header.font_size_pt);
        font.bold = Some(header.font_bold);
        font.italic = Some(header.font_italic);
        font.underline = Some(header.font_underline);
        font.color.set_theme_color(StyleConfig::theme_color(&header.text_color_theme));
        font.color.set_brightness(header.text_color_brightness)
    }

    fn style_body_cell(&self, cell: &mut Cell, body: &TableBodyStyle, col: usize) -> Result<()> {
        cell.fill.solid();
        let fill = cell.fill.fore_color_mut()?;
        fill.set_theme_color(StyleConfig::theme_color(&body.fill_theme));
        fill.set_brightness(self.config.body_brightness(col))?;

        cell.margin_left_emu = body.margin_left_emu;
        cell.margin_right_emu = body.margin_right_emu;
        cell.margin_top_emu = body.margin_top_emu;
        cell.margin_bottom_emu = body.margin_bottom_emu;
        cell.vertical_anchor = VerticalAnchor::from_name_or_default(&body.vertical_align);
        cell.horizontal_align = HorizontalAlign::from_name_or_default(&body.horizontal_align);

        let font = &mut cell.font;
        font.name = Some(body.font_family.clone());
        font.size_pt = Some(body.font_size_pt);
        font.bold = Some(body.font_bold);
        font.italic = Some(body.font_italic);
        font.underline = Some(body.font_underline);
        font.color.set_theme_color(StyleConfig::theme_color(&body.text_color_theme));
        font.color.set_brightness(body.text_color_brightness)
    }

    /// Builds a chart in place of `placeholder` and styles it from the chart template.
    ///
    /// Unknown `chart_kind` values build a line chart.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for missing categories or series, a series whose length
    /// differs from the category count, or a non-numeric value.
    /// [`Error::MissingDependency`] if no chart styling was configured; charts are
    /// never left unstyled. Both are reported before the slide is changed.
    pub fn build_chart(&self, slide: &mut Slide, placeholder: ShapeId, spec: &ChartSpec) -> Result<ShapeId> {
        info!("Creating styled chart (type: {})", spec.chart_kind);

        if spec.categories.is_empty() {
            return Err(invalid("Chart must have categories".to_string()));
        }
        if spec.series.is_empty() {
            return Err(invalid("Chart must have series".to_string()));
        }

        let mut series = Vec::with_capacity(spec.series.len());
        for (idx, series_spec) in spec.series.iter().enumerate() {
            let name = series_spec.name.clone().unwrap_or_else(|| format!("Series{}", idx + 1));
            if series_spec.values.is_empty() {
                return Err(invalid(format!("Series '{name}' must have values")));
            }
            if series_spec.values.len() != spec.categories.len() {
                return Err(invalid(format!(
                    "Series '{name}' has {} values, expected {}",
                    series_spec.values.len(),
                    spec.categories.len()
                )));
            }
            let values = series_spec
                .values
                .iter()
                .map(|value| {
                    value.as_f64().ok_or_else(|| invalid(format!("Series '{name}' contains non-numeric value: {value:?}")))
                })
                .collect::<Result<Vec<f64>>>()?;
            series.push(Series::new(name, values));
        }

        let Some(styling) = self.chart_styling.as_deref() else {
            error!("Chart template styling not available - required for chart styling");
            return Err(Error::MissingDependency("chart template styling (.crtx)".to_string()));
        };
        let target = slide.shape(placeholder).ok_or(Error::ShapeNotFound(placeholder))?;
        let rect = target.rect;
        let convertible = target.placeholder().is_some_and(|ph| ph.kind.accepts_chart());
        debug!("Chart validated: {} categories, {} series", spec.categories.len(), series.len());
        self.ensure_snapshot();

        let chart = Chart::new(ChartKind::from_name(&spec.chart_kind), spec.categories.clone(), series);
        let mut placeholder_consumed = false;
        let chart_id = if convertible {
            placeholder_consumed = true;
            slide.insert_chart(placeholder, chart)?
        } else {
            slide.add_chart(chart, rect)
        };

        let report = apply_chart_styling(slide.chart_mut(chart_id)?, styling, false);
        if report.is_clean() {
            info!("Chart styling applied successfully");
        } else {
            warn!("Chart styled with {} skipped field(s)", report.warnings.len());
        }

        if !placeholder_consumed {
            remove_placeholder(slide, placeholder);
        }
        Ok(chart_id)
    }

    /// Lays out rounded-rectangle nodes over the placeholder's area.
    ///
    /// `position` is the node center relative to the placeholder (default
    /// `(0.5, 0.5)`); width and height are in inches (default 2 x 1). Only nodes are
    /// drawn; edges are not supported. The placeholder is removed afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if there are no nodes, [`Error::InvalidColor`] if the
    /// diagram fill or border color is not a hex value. Both before the slide is changed.
    pub fn build_diagram(&self, slide: &mut Slide, placeholder: ShapeId, spec: &DiagramSpec) -> Result<Vec<ShapeId>> {
        info!("Creating styled diagram ({} nodes)", spec.nodes.len());
        if spec.nodes.is_empty() {
            return Err(invalid("Diagram must have nodes".to_string()));
        }

        let node_style = &self.config.document().diagram.node;
        let fill = StyleConfig::hex_to_rgb(&node_style.fill)?;
        let border = StyleConfig::hex_to_rgb(&node_style.border_color)?;
        let text_theme = StyleConfig::theme_color(&node_style.text_color_theme);
        let target = slide.shape(placeholder).ok_or(Error::ShapeNotFound(placeholder))?;
        let base = target.rect;
        let is_placeholder = target.is_placeholder();

        let mut created = Vec::with_capacity(spec.nodes.len());
        for node in &spec.nodes {
            let (x, y) = node.position.unwrap_or((0.5, 0.5));
            let width = inches_to_emu(node.width.unwrap_or(DEFAULT_NODE_WIDTH_IN));
            let height = inches_to_emu(node.height.unwrap_or(DEFAULT_NODE_HEIGHT_IN));
            let left = base.left + (x * base.width as f64) as i64 - width / 2;
            let top = base.top + (y * base.height as f64) as i64 - height / 2;

            let mut shape = AutoShape::new("roundRect");
            shape.fill.solid();
            shape.fill.fore_color_mut()?.set_rgb(fill);
            shape.line.color_mut().set_rgb(border);
            shape.line.width_emu = Some((node_style.border_width_pt * EMU_PER_POINT as f64).round() as i64);
            shape.text = node.text.clone();
            shape.font.size_pt = Some(node_style.font_size_pt);
            shape.font.bold = Some(node_style.font_bold);
            shape.font.color.set_theme_color(text_theme);
            shape.horizontal_align = HorizontalAlign::Center;
            shape.vertical_anchor = VerticalAnchor::Middle;

            created.push(slide.add_auto_shape(shape, Rect::new(left, top, width, height)));
        }

        if is_placeholder {
            remove_placeholder(slide, placeholder);
        }
        Ok(created)
    }
}

fn invalid(message: String) -> Error {
    error!("{message}");
    Error::Validation(message)
}

fn remove_placeholder(slide: &mut Slide, placeholder: ShapeId) {
    match slide.remove_shape(placeholder) {
        Ok(_) => debug!("Placeholder shape {placeholder} removed"),
        Err(e) => warn!("Could not remove placeholder shape: {e}"),
    }
}

fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

/// Column kinds from the first data row (row 1 under a header, else row 0).
fn detect_column_types(data: &[Vec<String>], header_row: bool) -> Vec<ColumnType> {
    let sample_row = if header_row && data.len() > 1 { 1 } else { 0 };
    data.get(sample_row)
        .map(|row| {
            row.iter()
                .map(|value| {
                    let cleaned: String = value.trim().chars().filter(|c| !NUMBER_DECORATIONS.contains(c)).collect();
                    if cleaned.parse::<f64>().is_ok() {
                        ColumnType::Number
                    } else {
                        ColumnType::Text
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Re-renders the leading number of `text` with thousands separators,
/// keeping whatever follows it (`"1234567円"` becomes `"1,234,567円"`).
/// Text that does not start with a number is returned unchanged.
fn format_number_text(text: &str) -> String {
    let plain = text.replace(',', "");
    let split = plain.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(plain.len());
    let (number, suffix) = plain.split_at(split);
    if number.is_empty() {
        return text.to_string();
    }
    let Ok(value) = number.parse::<f64>() else {
        return text.to_string();
    };

    let rendered = value.to_string();
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + suffix.len() + 8);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped.push_str(suffix);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_text() {
        assert_eq!(format_number_text("98765"), "98,765");
        assert_eq!(format_number_text("1234567円"), "1,234,567円");
        assert_eq!(format_number_text("3500万"), "3,500万");
        assert_eq!(format_number_text("1,234.5%"), "1,234.5%");
        assert_eq!(format_number_text("12.0"), "12");
        assert_eq!(format_number_text("999"), "999");
        assert_eq!(format_number_text("¥1000"), "¥1000");
        assert_eq!(format_number_text("n/a"), "n/a");
        assert_eq!(format_number_text("1.2.3"), "1.2.3");
    }

    #[test]
    fn test_detect_column_types() {
        let data = vec![
            vec!["Item".to_string(), "Amount".to_string(), "Share".to_string()],
            vec!["Rent".to_string(), "¥1,200万".to_string(), "12.5%".to_string()],
        ];
        assert_eq!(detect_column_types(&data, true), vec![ColumnType::Text, ColumnType::Number, ColumnType::Number]);
        assert_eq!(detect_column_types(&data, false), vec![ColumnType::Text; 3]);
    }
}
