use crate::chart::{Axis, Chart, LabelPosition, LegendPosition, Series, TickMark};
use crate::color::{brightness, RgbColor, ThemeColor};
use crate::format::ColorFormat;
use crate::types::{AxisStyle, ColorKind, RawColor, SeriesStyle, StylingRecord};
use crate::Result;
use log::{debug, info, warn};
use std::fmt;

/// Brightness of the neutral tint given to the first pie slice past the styled ones.
const PIE_OVERFLOW_START: f64 = -0.10;
/// Brightness step per further overflow slice; the tint never exceeds `0.0`.
const PIE_OVERFLOW_STEP: f64 = 0.05;

/// A single styling field that could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleWarning {
    pub target: String,
    pub message: String,
}

impl fmt::Display for StyleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target, self.message)
    }
}

/// Outcome of [`apply_chart_styling`]: how many fields were set and which were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub applied: usize,
    pub warnings: Vec<StyleWarning>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Runs one best-effort styling step. A failure is logged and recorded, never propagated.
    fn attempt(&mut self, target: impl Into<String>, step: impl FnOnce() -> Result<()>) {
        match step() {
            Ok(()) => self.applied += 1,
            Err(e) => {
                let warning = StyleWarning { target: target.into(), message: e.to_string() };
                warn!("Failed to apply chart styling to {warning}");
                self.warnings.push(warning);
            }
        }
    }
}

/// Replays template styling onto a chart.
///
/// Style lists are positionally aligned with the chart's series: `styling.series[i]`
/// colors series *i* (slice *i* for pie charts) and `styling.data_labels[i]` labels
/// series *i*. Series beyond the style list stay uncolored, except pie slices,
/// which continue with a lightening `bg1` tint. Series beyond the label list use
/// label entry 0.
///
/// `limited_mode` applies series colors and the legend only, skipping the axis
/// and data-label passes.
pub fn apply_chart_styling(chart: &mut Chart, styling: &StylingRecord, limited_mode: bool) -> ApplyReport {
    let mut report = ApplyReport::default();

    apply_series(chart, styling, &mut report);

    if limited_mode {
        info!("Limited mode: skipping axis and data label styling");
    } else {
        if !chart.kind().is_pie() {
            apply_axes(chart, styling, &mut report);
        }
        apply_data_labels(chart, styling, &mut report);
    }

    apply_legend(chart, styling, &mut report);

    debug!("Chart styling: {} fields applied, {} warnings", report.applied, report.warnings.len());
    report
}

fn apply_series(chart: &mut Chart, styling: &StylingRecord, report: &mut ApplyReport) {
    let kind = chart.kind();
    let styles = &styling.series;

    for (idx, series) in chart.series_mut().iter_mut().enumerate() {
        if kind.is_pie() {
            apply_pie_points(series, styles, report);
            continue;
        }
        let Some(style) = styles.get(idx) else {
            break;
        };

        if kind.has_filled_series() {
            series.fill.solid();
            if let Some(fill) = &style.fill {
                report.attempt(format!("series {idx} fill"), || set_color(series.fill.fore_color_mut()?, fill));
            }
            if let Some(lum_mod) = style.line_lum_mod {
                report.attempt(format!("series {idx} outline"), || {
                    let color = series.line.color_mut();
                    color.set_theme_color(ThemeColor::Background1);
                    color.set_brightness(brightness(lum_mod, 0))
                });
            }
        } else if let Some(fill) = &style.fill {
            report.attempt(format!("series {idx} line"), || set_color(series.line.color_mut(), fill));
        }
    }
}

/// Pie slices take the series style list positionally; slices past its end get
/// `bg1` lightened in steps from -0.10 up to 0.0.
fn apply_pie_points(series: &mut Series, styles: &[SeriesStyle], report: &mut ApplyReport) {
    for (point_idx, point) in series.points_mut().iter_mut().enumerate() {
        point.fill.solid();
        match styles.get(point_idx) {
            Some(point_style) => {
                if let Some(fill) = &point_style.fill {
                    report.attempt(format!("pie point {point_idx} fill"), || set_color(point.fill.fore_color_mut()?, fill));
                }
            }
            None => {
                let extra_idx = (point_idx - styles.len()) as f64;
                let tint = (PIE_OVERFLOW_START + extra_idx * PIE_OVERFLOW_STEP).min(0.0);
                report.attempt(format!("pie point {point_idx} fill"), || {
                    let color = point.fill.fore_color_mut()?;
                    color.set_theme_color(ThemeColor::Background1);
                    color.set_brightness(tint)
                });
            }
        }
    }
}

fn apply_axes(chart: &mut Chart, styling: &StylingRecord, report: &mut ApplyReport) {
    if let Some(style) = &styling.category_axis {
        report.attempt("category axis", || apply_axis(chart.category_axis_mut()?, style));
    }
    if let Some(style) = &styling.value_axis {
        report.attempt("value axis", || apply_axis(chart.value_axis_mut()?, style));
    }

    if chart.kind().is_area() {
        info!("Leaving gridlines untouched for area chart");
        return;
    }

    report.attempt("value axis gridlines", || {
        let axis = chart.value_axis_mut()?;
        axis.has_major_gridlines = false;
        axis.has_minor_gridlines = false;
        Ok(())
    });
    report.attempt("category axis gridlines", || {
        let axis = chart.category_axis_mut()?;
        axis.has_major_gridlines = false;
        axis.has_minor_gridlines = false;
        Ok(())
    });
}

/// Applies one axis sub-record; the first failing field abandons the rest of this axis.
fn apply_axis(axis: &mut Axis, style: &AxisStyle) -> Result<()> {
    axis.visible = style.visible;

    if let Some(tick) = style.major_tick_mark.as_deref().and_then(TickMark::from_code) {
        axis.major_tick_mark = tick;
    }
    if let Some(tick) = style.minor_tick_mark.as_deref().and_then(TickMark::from_code) {
        axis.minor_tick_mark = tick;
    }

    if let Some(width) = style.line_width_emu {
        axis.line.width_emu = Some(width);
    }
    if let Some(color) = &style.line_color {
        set_color(axis.line.color_mut(), color)?;
    }

    if let Some(font) = &style.font {
        if let Some(size) = font.size_pt {
            axis.tick_label_font.size_pt = Some(size);
        }
        if let Some(color) = &font.color {
            set_color(&mut axis.tick_label_font.color, color)?;
        }
    }

    Ok(())
}

fn apply_data_labels(chart: &mut Chart, styling: &StylingRecord, report: &mut ApplyReport) {
    let Some(default_style) = styling.data_labels.first() else {
        return;
    };
    let kind = chart.kind();

    for (idx, series) in chart.series_mut().iter_mut().enumerate() {
        let style = styling.data_labels.get(idx).unwrap_or(default_style);
        if !style.show_value {
            continue;
        }

        let labels = series.data_labels_mut();
        labels.show_value = true;

        let position = match style.position.as_deref() {
            Some(code) => {
                let position = LabelPosition::from_code(code);
                if position.is_none() {
                    warn!("Unknown data label position '{code}' for series {idx}");
                }
                position
            }
            None => kind.default_label_position(),
        };
        if !kind.is_area() {
            if let Some(position) = position {
                labels.position = Some(position);
            }
        }

        if let Some(format) = &style.number_format {
            labels.number_format = Some(format.clone());
            labels.number_format_linked = style.number_format_linked.unwrap_or(false);
        }
        if let Some(size) = style.font_size_pt {
            labels.font.size_pt = Some(size);
        }
        if let Some(color) = &style.font_color {
            report.attempt(format!("series {idx} data label color"), || set_color(&mut labels.font.color, color));
        }
    }
}

fn apply_legend(chart: &mut Chart, styling: &StylingRecord, report: &mut ApplyReport) {
    let Some(style) = &styling.legend else {
        return;
    };

    chart.set_has_legend(true);
    let Some(legend) = chart.legend_mut() else {
        return;
    };

    if let Some(code) = style.position.as_deref() {
        match LegendPosition::from_code(code) {
            Some(position) => legend.position = position,
            None => warn!("Unknown legend position '{code}'"),
        }
    }
    if let Some(overlay) = style.overlay {
        legend.include_in_layout = overlay;
    }
    if let Some(size) = style.font_size_pt {
        legend.font.size_pt = Some(size);
    }
    if let Some(color) = &style.font_color {
        report.attempt("legend font color", || set_color(&mut legend.font.color, color));
    }
}

/// Sets a template color on a live color. Theme colors carry the brightness
/// derived from `lumMod` (and `lumOff`, when present) if the template had a modulation.
fn set_color(target: &mut ColorFormat, raw: &RawColor) -> Result<()> {
    match raw.kind {
        ColorKind::Rgb => target.set_rgb(RgbColor::from_hex(&raw.value)?),
        ColorKind::Theme => {
            target.set_theme_color(raw.value.parse()?);
            if let Some(lum_mod) = raw.lum_mod {
                target.set_brightness(brightness(lum_mod, raw.lum_off.unwrap_or(0)))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, Series};
    use crate::format::ColorValue;
    use crate::types::{DataLabelStyle, LegendStyle, SeriesStyle};

    fn themed(name: &str, lum_mod: Option<i32>) -> RawColor {
        RawColor { lum_mod, ..RawColor::theme(name) }
    }

    fn record() -> StylingRecord {
        StylingRecord {
            series: vec![
                SeriesStyle { fill: Some(RawColor::rgb("4F4F70")), line_lum_mod: None },
                SeriesStyle { fill: Some(themed("bg1", Some(75_000))), line_lum_mod: Some(95_000) },
            ],
            category_axis: Some(AxisStyle {
                major_tick_mark: Some("none".into()),
                line_width_emu: Some(9525),
                ..AxisStyle::default()
            }),
            value_axis: Some(AxisStyle { visible: false, ..AxisStyle::default() }),
            data_labels: vec![DataLabelStyle {
                show_value: true,
                number_format: Some("#,##0".into()),
                font_size_pt: Some(10.5),
                ..DataLabelStyle::default()
            }],
            legend: Some(LegendStyle { position: Some("t".into()), overlay: Some(false), ..LegendStyle::default() }),
            ..StylingRecord::default()
        }
    }

    fn chart(kind: ChartKind, series_count: usize, points: usize) -> Chart {
        let categories = (0..points).map(|i| format!("c{i}")).collect();
        let series = (0..series_count).map(|i| Series::new(format!("s{i}"), vec![1.0; points])).collect();
        Chart::new(kind, categories, series)
    }

    #[test]
    fn test_column_series_fill_and_outline() {
        let mut chart = chart(ChartKind::ColumnClustered, 3, 2);
        let report = apply_chart_styling(&mut chart, &record(), false);
        assert!(report.is_clean());

        let series = chart.series();
        assert_eq!(series[0].fill.fore_color().value(), Some(ColorValue::Rgb(RgbColor::new(0x4F, 0x4F, 0x70))));
        assert_eq!(series[1].fill.fore_color().theme_color(), Some(ThemeColor::Background1));
        assert_eq!(series[1].fill.fore_color().brightness(), -0.25);
        assert_eq!(series[1].line.color().theme_color(), Some(ThemeColor::Background1));
        assert!((series[1].line.color().brightness() + 0.05).abs() < 1e-9);
        // third series has no style entry
        assert_eq!(series[2].fill.fore_color().value(), None);
    }

    #[test]
    fn test_line_chart_colors_the_line() {
        let mut chart = chart(ChartKind::Line, 1, 3);
        apply_chart_styling(&mut chart, &record(), false);
        let series = &chart.series()[0];
        assert_eq!(series.line.color().rgb(), Some(RgbColor::new(0x4F, 0x4F, 0x70)));
        assert_eq!(series.fill.fore_color().value(), None);
        assert_eq!(series.data_labels().unwrap().position, Some(LabelPosition::Above));
    }

    #[test]
    fn test_pie_overflow_points() {
        let mut chart = chart(ChartKind::Pie, 1, 5);
        let report = apply_chart_styling(&mut chart, &record(), false);
        assert!(report.is_clean());

        let points = chart.series()[0].points();
        assert_eq!(points[0].fill.fore_color().rgb(), Some(RgbColor::new(0x4F, 0x4F, 0x70)));
        assert_eq!(points[1].fill.fore_color().brightness(), -0.25);

        let tints: Vec<f64> = points[2..].iter().map(|p| p.fill.fore_color().brightness()).collect();
        for (tint, expected) in tints.iter().zip([-0.10, -0.05, 0.0]) {
            assert!((tint - expected).abs() < 1e-9, "{tint} != {expected}");
        }
        assert!(points[2..].iter().all(|p| p.fill.fore_color().theme_color() == Some(ThemeColor::Background1)));
        assert!(chart.category_axis().is_none());
    }

    #[test]
    fn test_pie_without_series_styles_uses_overflow_tints() {
        let mut chart = chart(ChartKind::Pie, 1, 4);
        let report = apply_chart_styling(&mut chart, &StylingRecord::default(), false);
        assert!(report.is_clean());

        let points = chart.series()[0].points();
        assert!(points.iter().all(|p| p.fill.fore_color().theme_color() == Some(ThemeColor::Background1)));
        let tints: Vec<f64> = points.iter().map(|p| p.fill.fore_color().brightness()).collect();
        for (tint, expected) in tints.iter().zip([-0.10, -0.05, 0.0, 0.0]) {
            assert!((tint - expected).abs() < 1e-9, "{tint} != {expected}");
        }
    }

    #[test]
    fn test_axes_and_gridlines() {
        let mut chart = chart(ChartKind::ColumnStacked, 1, 2);
        apply_chart_styling(&mut chart, &record(), false);

        let cat = chart.category_axis().unwrap();
        assert_eq!(cat.major_tick_mark, TickMark::None);
        assert_eq!(cat.line.width_emu, Some(9525));
        let val = chart.value_axis().unwrap();
        assert!(!val.visible);
        assert!(!val.has_major_gridlines);
        assert_eq!(chart.series()[0].data_labels().unwrap().position, Some(LabelPosition::Center));
    }

    #[test]
    fn test_area_chart_keeps_gridlines_and_label_position() {
        let mut chart = chart(ChartKind::Area, 1, 2);
        apply_chart_styling(&mut chart, &record(), false);
        assert!(chart.value_axis().unwrap().has_major_gridlines);
        let labels = chart.series()[0].data_labels().unwrap();
        assert!(labels.show_value);
        assert_eq!(labels.position, None);
    }

    #[test]
    fn test_limited_mode_skips_axes_and_labels() {
        let mut chart = chart(ChartKind::ColumnClustered, 2, 2);
        apply_chart_styling(&mut chart, &record(), true);

        assert!(chart.value_axis().unwrap().visible);
        assert!(chart.value_axis().unwrap().has_major_gridlines);
        assert!(chart.series().iter().all(|s| !s.has_data_labels()));
        assert_eq!(chart.series()[0].fill.fore_color().rgb(), Some(RgbColor::new(0x4F, 0x4F, 0x70)));
        let legend = chart.legend().unwrap();
        assert_eq!(legend.position, LegendPosition::Top);
    }

    #[test]
    fn test_labels_fall_back_to_first_entry() {
        let mut chart = chart(ChartKind::BarClustered, 3, 2);
        apply_chart_styling(&mut chart, &record(), false);
        for series in chart.series() {
            let labels = series.data_labels().unwrap();
            assert_eq!(labels.number_format.as_deref(), Some("#,##0"));
            assert_eq!(labels.font.size_pt, Some(10.5));
            assert_eq!(labels.position, Some(LabelPosition::OutsideEnd));
        }
    }

    #[test]
    fn test_unknown_theme_is_a_warning() {
        let mut styling = record();
        styling.series[1].fill = Some(themed("brand7", Some(50_000)));
        styling.legend.as_mut().unwrap().font_color = Some(themed("nope", None));

        let mut chart = chart(ChartKind::ColumnClustered, 2, 2);
        let report = apply_chart_styling(&mut chart, &styling, false);

        let targets: Vec<&str> = report.warnings.iter().map(|w| w.target.as_str()).collect();
        assert_eq!(targets, vec!["series 1 fill", "legend font color"]);
        // the outline of the same series and the other passes still ran
        assert_eq!(chart.series()[1].line.color().theme_color(), Some(ThemeColor::Background1));
        assert_eq!(chart.legend().unwrap().position, LegendPosition::Top);
        assert!(report.applied > 0);
    }

    #[test]
    fn test_pie_axis_style_is_not_an_error() {
        let mut chart = chart(ChartKind::Pie, 1, 2);
        let report = apply_chart_styling(&mut chart, &record(), false);
        assert!(report.is_clean());
    }
}
