use crate::constants::{A_NAMESPACE, C_NAMESPACE};
use crate::parser_config::ExtractConfig;
use crate::types::{AxisStyle, DataLabelStyle, FontStyle, LegendStyle, RawColor, SeriesStyle, StylingRecord};
use crate::{Error, Result};
use roxmltree::{Document, Node};
use std::io::Read;
use std::path::Path;

/// Opens a `.crtx` chart template and extracts its chart styling.
///
/// The chart part is read from `config.chart_part` (normally `chart/chart.xml`).
/// Only the chart-related fields of the returned [`StylingRecord`] are populated;
/// table and flowchart styling stay at their defaults.
///
/// # Errors
///
/// A missing or unreadable archive, a missing chart part or malformed XML are
/// returned as errors. Missing elements inside a well-formed chart are not errors:
/// they simply leave the corresponding field empty.
pub fn extract_crtx_styling(path: &Path, config: &ExtractConfig) -> Result<StylingRecord> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut chart_xml = Vec::new();
    match archive.by_name(&config.chart_part) {
        Ok(mut part) => {
            part.read_to_end(&mut chart_xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Err(Error::PartNotFound(config.chart_part.clone())),
        Err(e) => return Err(e.into()),
    }

    parse_chart_xml(&chart_xml)
}

/// Parses a DrawingML chart part (`<c:chartSpace>`) into a [`StylingRecord`].
pub fn parse_chart_xml(xml_data: &[u8]) -> Result<StylingRecord> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let mut record = StylingRecord::default();

    for ser in root.descendants().filter(|n| is_c(n, "ser")) {
        record.series.push(parse_series(&ser));
    }

    record.category_axis = first_descendant(&root, C_NAMESPACE, "catAx").map(|n| parse_axis(&n));
    record.value_axis = first_descendant(&root, C_NAMESPACE, "valAx").map(|n| parse_axis(&n));

    for d_lbls in root.descendants().filter(|n| is_c(n, "dLbls")) {
        record.data_labels.push(parse_data_labels(&d_lbls));
    }

    record.legend = first_descendant(&root, C_NAMESPACE, "legend").map(|n| parse_legend(&n));

    Ok(record)
}

/// Reads the series fill from `<c:spPr>` and the outline modulation from its `<a:ln>`.
fn parse_series(ser: &Node) -> SeriesStyle {
    let mut style = SeriesStyle::default();

    let Some(sp_pr) = child(ser, C_NAMESPACE, "spPr") else {
        return style;
    };

    style.fill = child(&sp_pr, A_NAMESPACE, "solidFill").and_then(|fill| parse_solid_fill(&fill));

    style.line_lum_mod = child(&sp_pr, A_NAMESPACE, "ln")
        .and_then(|ln| child(&ln, A_NAMESPACE, "solidFill"))
        .and_then(|fill| child(&fill, A_NAMESPACE, "schemeClr"))
        .and_then(|scheme| child(&scheme, A_NAMESPACE, "lumMod"))
        .and_then(|lum| int_attr(&lum, "val"));

    style
}

fn parse_axis(axis: &Node) -> AxisStyle {
    let mut style = AxisStyle {
        // `<c:delete/>` without a value means deleted.
        visible: child(axis, C_NAMESPACE, "delete")
            .map(|n| matches!(n.attribute("val"), Some("0") | Some("false")))
            .unwrap_or(true),
        ..AxisStyle::default()
    };

    style.major_tick_mark = child_val(axis, "majorTickMark");
    style.minor_tick_mark = child_val(axis, "minorTickMark");
    style.font = child(axis, C_NAMESPACE, "txPr").and_then(|tx_pr| parse_text_font(&tx_pr));

    if let Some(ln) = child(axis, C_NAMESPACE, "spPr").and_then(|sp_pr| child(&sp_pr, A_NAMESPACE, "ln")) {
        style.line_width_emu = ln.attribute("w").and_then(|w| w.parse().ok());
        style.line_color = child(&ln, A_NAMESPACE, "solidFill").and_then(|fill| parse_solid_fill(&fill));
    }

    style
}

fn parse_data_labels(d_lbls: &Node) -> DataLabelStyle {
    let mut style = DataLabelStyle {
        show_value: child(d_lbls, C_NAMESPACE, "showVal")
            .map(|n| is_true(n.attribute("val")))
            .unwrap_or(false),
        position: child_val(d_lbls, "dLblPos"),
        ..DataLabelStyle::default()
    };

    if let Some(num_fmt) = child(d_lbls, C_NAMESPACE, "numFmt") {
        style.number_format = num_fmt.attribute("formatCode").map(str::to_string);
        style.number_format_linked = num_fmt.attribute("sourceLinked").map(|v| is_true(Some(v)));
    }

    if let Some(font) = child(d_lbls, C_NAMESPACE, "txPr").and_then(|tx_pr| parse_text_font(&tx_pr)) {
        style.font_size_pt = font.size_pt;
        style.font_color = font.color;
    }

    style
}

fn parse_legend(legend: &Node) -> LegendStyle {
    let mut style = LegendStyle {
        position: child_val(legend, "legendPos"),
        overlay: child(legend, C_NAMESPACE, "overlay").map(|n| is_true(n.attribute("val"))),
        ..LegendStyle::default()
    };

    if let Some(font) = child(legend, C_NAMESPACE, "txPr").and_then(|tx_pr| parse_text_font(&tx_pr)) {
        style.font_size_pt = font.size_pt;
        style.font_color = font.color;
    }

    style
}

/// Reads `<a:defRPr sz=".."><a:solidFill>..</a:solidFill></a:defRPr>` below a `<c:txPr>`.
fn parse_text_font(tx_pr: &Node) -> Option<FontStyle> {
    let def_r_pr = first_descendant(tx_pr, A_NAMESPACE, "defRPr")?;
    Some(FontStyle {
        size_pt: def_r_pr.attribute("sz").and_then(|sz| sz.parse::<f64>().ok()).map(|sz| sz / 100.0),
        color: child(&def_r_pr, A_NAMESPACE, "solidFill").and_then(|fill| parse_solid_fill(&fill)),
    })
}

/// Reads the color of an `<a:solidFill>`.
///
/// An explicit `<a:srgbClr>` wins over a `<a:schemeClr>`. For scheme colors the
/// `lumMod`/`lumOff` children are captured only when present.
pub(crate) fn parse_solid_fill(solid_fill: &Node) -> Option<RawColor> {
    if let Some(hex) = child(solid_fill, A_NAMESPACE, "srgbClr").and_then(|n| n.attribute("val")) {
        return Some(RawColor::rgb(hex));
    }

    let scheme = child(solid_fill, A_NAMESPACE, "schemeClr")?;
    let mut color = RawColor::theme(scheme.attribute("val")?);
    color.lum_mod = child(&scheme, A_NAMESPACE, "lumMod").and_then(|n| int_attr(&n, "val"));
    color.lum_off = child(&scheme, A_NAMESPACE, "lumOff").and_then(|n| int_attr(&n, "val"));
    Some(color)
}

pub(crate) fn child<'a, 'input: 'a>(node: &Node<'a, 'input>, namespace: &str, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == Some(namespace))
}

pub(crate) fn first_descendant<'a, 'input: 'a>(node: &Node<'a, 'input>, namespace: &str, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|n| n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == Some(namespace))
}

fn child_val(node: &Node, name: &str) -> Option<String> {
    child(node, C_NAMESPACE, name).and_then(|n| n.attribute("val")).map(str::to_string)
}

pub(crate) fn int_attr(node: &Node, name: &str) -> Option<i32> {
    node.attribute(name).and_then(|v| v.parse().ok())
}

pub(crate) fn is_true(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

fn is_c(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(C_NAMESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorKind;
    use std::fs;
    use std::path::PathBuf;

    fn load_xml(filename: &str) -> Vec<u8> {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests");
        path.push("test_data");
        path.push("xml");
        path.push(filename);
        fs::read(path).expect("Unable to read test data file")
    }

    #[test]
    fn test_parse_series_fills() {
        let record = parse_chart_xml(&load_xml("chart.xml")).unwrap();
        assert_eq!(record.series.len(), 2);

        let first = record.series[0].fill.as_ref().unwrap();
        assert_eq!(first.kind, ColorKind::Rgb);
        assert_eq!(first.value, "#4F4F70");
        assert_eq!(record.series[0].line_lum_mod, None);

        let second = record.series[1].fill.as_ref().unwrap();
        assert_eq!(second.kind, ColorKind::Theme);
        assert_eq!(second.value, "bg1");
        assert_eq!(second.lum_mod, Some(75_000));
        assert_eq!(second.lum_off, None);
        assert_eq!(record.series[1].line_lum_mod, Some(95_000));
    }

    #[test]
    fn test_parse_axes() {
        let record = parse_chart_xml(&load_xml("chart.xml")).unwrap();

        let cat = record.category_axis.unwrap();
        assert!(cat.visible);
        assert_eq!(cat.major_tick_mark.as_deref(), Some("none"));
        assert_eq!(cat.minor_tick_mark.as_deref(), Some("none"));
        assert_eq!(cat.line_width_emu, Some(9525));
        let line = cat.line_color.unwrap();
        assert_eq!(line.value, "tx1");
        assert_eq!(line.lum_mod, Some(15_000));
        assert_eq!(line.lum_off, Some(85_000));
        let font = cat.font.unwrap();
        assert_eq!(font.size_pt, Some(12.0));
        assert_eq!(font.color.unwrap().lum_mod, Some(65_000));

        let val = record.value_axis.unwrap();
        assert!(!val.visible);
        assert_eq!(val.major_tick_mark.as_deref(), Some("out"));
    }

    #[test]
    fn test_parse_labels_and_legend() {
        let record = parse_chart_xml(&load_xml("chart.xml")).unwrap();
        assert_eq!(record.data_labels.len(), 2);

        let first = &record.data_labels[0];
        assert!(first.show_value);
        assert_eq!(first.position.as_deref(), Some("outEnd"));
        assert_eq!(first.number_format.as_deref(), Some("#,##0"));
        assert_eq!(first.number_format_linked, Some(false));
        assert_eq!(first.font_size_pt, Some(10.5));
        assert_eq!(first.font_color.as_ref().unwrap().kind, ColorKind::Rgb);

        let second = &record.data_labels[1];
        assert!(!second.show_value);
        assert_eq!(second.position, None);

        let legend = record.legend.unwrap();
        assert_eq!(legend.position.as_deref(), Some("b"));
        assert_eq!(legend.overlay, Some(false));
        assert_eq!(legend.font_size_pt, Some(11.0));
        let color = legend.font_color.unwrap();
        assert_eq!(color.value, "tx1");
        assert_eq!(color.lum_mod, Some(65_000));
        assert_eq!(color.lum_off, Some(35_000));
    }

    #[test]
    fn test_parse_minimal_chart() {
        let xml = br#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart><c:plotArea><c:barChart><c:ser><c:idx val="0"/></c:ser></c:barChart></c:plotArea></c:chart></c:chartSpace>"#;
        let record = parse_chart_xml(xml).unwrap();
        assert_eq!(record.series, vec![SeriesStyle::default()]);
        assert!(record.category_axis.is_none());
        assert!(record.legend.is_none());
        assert!(record.data_labels.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml() {
        assert!(matches!(parse_chart_xml(b"<c:chartSpace"), Err(Error::Xml(_))));
    }
}
