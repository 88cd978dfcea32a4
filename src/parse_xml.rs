use crate::color::ThemeColor;
use crate::constants::{A_NAMESPACE, EMU_PER_POINT, OOXML_DEGREE, OOXML_PERCENT, P_NAMESPACE, TABLE_URI};
use crate::crtx::{child, first_descendant, int_attr, is_true, parse_solid_fill};
use crate::types::{ColorKind, FlowchartStyle, RawColor, TableStyle};
use crate::{Error, Result};
use log::debug;
use roxmltree::{Document, Node};

/// Text and box properties sampled from one exemplar table cell.
#[derive(Debug, Default)]
struct CellSample {
    fill: Option<RawColor>,
    font_size_pt: Option<f64>,
    bold: bool,
    italic: Option<bool>,
    underline: Option<bool>,
    font_family: Option<String>,
    text_color: Option<RawColor>,
    margins: [Option<i64>; 4],
    anchor: Option<&'static str>,
    align: Option<&'static str>,
}

/// Parses a slide part and samples the first table on it into a [`TableStyle`].
///
/// Row 0 is the header exemplar (first cell only), row 1 the body exemplar
/// (every column contributes a fill brightness). A slide without a table, or a
/// table with a single row, leaves the missing parts at their defaults.
///
/// # Errors
///
/// Only malformed XML or a slide without `<p:cSld>/<p:spTree>` is an error.
pub fn parse_table_style(xml_data: &[u8]) -> Result<TableStyle> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let sp_tree = find_sp_tree(&doc)?;

    let mut style = TableStyle::default();

    let Some(tbl_node) = sp_tree.descendants().find(|n| {
        is_a(n, "tbl") && n.parent().is_some_and(|p| is_a(&p, "graphicData") && p.attribute("uri") == Some(TABLE_URI))
    }) else {
        debug!("No table found on slide, keeping default table style");
        return Ok(style);
    };

    let rows: Vec<Node> = tbl_node.children().filter(|n| is_a(n, "tr")).collect();

    if let Some(header_cell) = rows.first().and_then(|row| row.children().find(|n| is_a(n, "tc"))) {
        let sample = sample_cell(&header_cell);
        let header = &mut style.header;

        match &sample.fill {
            Some(color) if color.kind == ColorKind::Theme => {
                header.fill_theme = theme_name(&color.value);
                header.fill_brightness = round_to(color.brightness().unwrap_or(0.0), 2);
            }
            Some(color) => header.fill_rgb = Some(color.value.clone()),
            None => {}
        }

        if let Some(size) = sample.font_size_pt {
            header.font_size_pt = size;
        }
        header.font_bold = sample.bold;
        if let Some(color) = sample.text_color.as_ref().filter(|c| c.kind == ColorKind::Theme) {
            header.text_color_theme = theme_name(&color.value);
            header.text_color_brightness = round_to(color.brightness().unwrap_or(0.0), 2);
        }
        if let Some(family) = sample.font_family {
            header.font_family = family;
        }
        header.font_italic = sample.italic.unwrap_or(header.font_italic);
        header.font_underline = sample.underline.unwrap_or(header.font_underline);
        let [left, right, top, bottom] = sample.margins;
        header.margin_left_emu = left.unwrap_or(header.margin_left_emu);
        header.margin_right_emu = right.unwrap_or(header.margin_right_emu);
        header.margin_top_emu = top.unwrap_or(header.margin_top_emu);
        header.margin_bottom_emu = bottom.unwrap_or(header.margin_bottom_emu);
        if let Some(anchor) = sample.anchor {
            header.vertical_align = anchor.to_string();
        }
        if let Some(align) = sample.align {
            header.horizontal_align = align.to_string();
        }
    }

    if let Some(body_row) = rows.get(1) {
        let cells: Vec<Node> = body_row.children().filter(|n| is_a(n, "tc")).collect();
        let samples: Vec<CellSample> = cells.iter().map(sample_cell).collect();
        let body = &mut style.body;

        let mut brightnesses = Vec::new();
        for (col_idx, sample) in samples.iter().enumerate() {
            if let Some(color) = sample.fill.as_ref().filter(|c| c.kind == ColorKind::Theme) {
                brightnesses.push(round_to(color.brightness().unwrap_or(0.0), 2));
                if col_idx == 0 {
                    body.fill_theme = theme_name(&color.value);
                }
            }
        }
        if !brightnesses.is_empty() {
            body.column_brightness = brightnesses;
        }

        if let Some(sample) = samples.into_iter().next() {
            if let Some(size) = sample.font_size_pt {
                body.font_size_pt = size;
            }
            if let Some(color) = sample.text_color.as_ref().filter(|c| c.kind == ColorKind::Theme) {
                body.text_color_theme = theme_name(&color.value);
                body.text_color_brightness = round_to(color.brightness().unwrap_or(0.0), 2);
            }
            if let Some(family) = sample.font_family {
                body.font_family = family;
            }
            body.font_italic = sample.italic.unwrap_or(body.font_italic);
            body.font_underline = sample.underline.unwrap_or(body.font_underline);
            let [left, right, top, bottom] = sample.margins;
            body.margin_left_emu = left.unwrap_or(body.margin_left_emu);
            body.margin_right_emu = right.unwrap_or(body.margin_right_emu);
            body.margin_top_emu = top.unwrap_or(body.margin_top_emu);
            body.margin_bottom_emu = bottom.unwrap_or(body.margin_bottom_emu);
            if let Some(anchor) = sample.anchor {
                body.vertical_align = anchor.to_string();
            }
            if let Some(align) = sample.align {
                body.horizontal_align = align.to_string();
            }
        }
    }

    Ok(style)
}

/// Samples a table cell node (`<a:tc>`): fill and margins from `<a:tcPr>`, text
/// properties from the first run of the first paragraph.
fn sample_cell(tc_node: &Node) -> CellSample {
    let mut sample = CellSample::default();

    if let Some(tc_pr) = child(tc_node, A_NAMESPACE, "tcPr") {
        sample.fill = child(&tc_pr, A_NAMESPACE, "solidFill").and_then(|fill| parse_solid_fill(&fill));
        sample.margins = ["marL", "marR", "marT", "marB"].map(|attr| tc_pr.attribute(attr).and_then(|v| v.parse().ok()));
        sample.anchor = tc_pr.attribute("anchor").and_then(anchor_name);
    }

    let Some(p_node) = child(tc_node, A_NAMESPACE, "txBody").and_then(|body| child(&body, A_NAMESPACE, "p")) else {
        return sample;
    };

    sample.align = child(&p_node, A_NAMESPACE, "pPr")
        .and_then(|p_pr| p_pr.attribute("algn"))
        .and_then(align_name);

    if let Some(r_pr) = child(&p_node, A_NAMESPACE, "r").and_then(|r| child(&r, A_NAMESPACE, "rPr")) {
        sample.font_size_pt = r_pr.attribute("sz").and_then(|sz| sz.parse::<f64>().ok()).map(|sz| (sz / 100.0).trunc());
        sample.bold = is_true(r_pr.attribute("b"));
        sample.italic = r_pr.attribute("i").map(|v| is_true(Some(v)));
        sample.underline = r_pr.attribute("u").map(|v| v != "none");
        sample.font_family = child(&r_pr, A_NAMESPACE, "latin")
            .and_then(|latin| latin.attribute("typeface"))
            .filter(|face| !face.starts_with('+'))
            .map(str::to_string);
        sample.text_color = child(&r_pr, A_NAMESPACE, "solidFill").and_then(|fill| parse_solid_fill(&fill));
    }

    sample
}

/// Parses a slide part and derives a [`FlowchartStyle`] from its shapes.
///
/// The first connector (`<p:cxnSp>`) becomes the connector exemplar. The node
/// exemplar is the first solid-filled auto shape whose name mentions "rounded" or
/// "rectangle"; an RGB-filled candidate wins over theme-filled ones found earlier.
///
/// # Errors
///
/// Only malformed XML or a slide without `<p:cSld>/<p:spTree>` is an error.
pub fn parse_flowchart_style(xml_data: &[u8]) -> Result<FlowchartStyle> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let sp_tree = find_sp_tree(&doc)?;

    let mut style = FlowchartStyle::default();
    let mut primary_shape: Option<Node> = None;
    let mut connector_found = false;
    let mut node_locked = false;

    for shape in sp_tree.children().filter(|n| n.is_element() && n.tag_name().namespace() == Some(P_NAMESPACE)) {
        match shape.tag_name().name() {
            "cxnSp" if !connector_found => {
                apply_connector(&shape, &mut style);
                connector_found = true;
            }
            "sp" if !node_locked && is_auto_shape(&shape) => {
                let name = shape_name(&shape).to_lowercase();
                if !(name.contains("rounded") || name.contains("rectangle") || name.contains("角丸")) {
                    continue;
                }
                let fill = child(&shape, P_NAMESPACE, "spPr")
                    .and_then(|sp_pr| child(&sp_pr, A_NAMESPACE, "solidFill"))
                    .and_then(|fill| parse_solid_fill(&fill));
                match fill {
                    Some(color) if color.kind == ColorKind::Rgb => {
                        primary_shape = Some(shape);
                        node_locked = true;
                    }
                    Some(_) if primary_shape.is_none() => primary_shape = Some(shape),
                    _ => {}
                }
            }
            _ => {}
        }
        if node_locked && connector_found {
            break;
        }
    }

    if let Some(shape) = primary_shape {
        debug!("Using shape '{}' as flowchart node exemplar", shape_name(&shape));
        apply_node(&shape, &mut style);
    }

    Ok(style)
}

fn apply_connector(cxn_sp: &Node, style: &mut FlowchartStyle) {
    let connector = &mut style.connector;
    let Some(sp_pr) = child(cxn_sp, P_NAMESPACE, "spPr") else {
        return;
    };

    if let Some(prst) = child(&sp_pr, A_NAMESPACE, "prstGeom").and_then(|g| g.attribute("prst")) {
        connector.kind = connector_kind(prst).to_string();
    }

    let Some(ln) = child(&sp_pr, A_NAMESPACE, "ln") else {
        return;
    };

    if let Some(color) = child(&ln, A_NAMESPACE, "solidFill")
        .and_then(|fill| parse_solid_fill(&fill))
        .filter(|c| c.kind == ColorKind::Theme)
    {
        connector.color_theme = theme_name(&color.value);
        connector.color_brightness = round_to(color.brightness().unwrap_or(0.0), 2);
    }

    if let Some(width) = ln.attribute("w").and_then(|w| w.parse::<i64>().ok()).filter(|w| *w > 0) {
        connector.width_pt = round_to(emu_to_pt(width), 1);
    }

    if let Some(dash) = child(&ln, A_NAMESPACE, "prstDash").and_then(|d| d.attribute("val")) {
        connector.dash_style = match dash {
            "solid" => "solid",
            "dot" | "sysDot" => "dot",
            _ => "dash",
        }
        .to_string();
    }

    if let Some(tail) = child(&ln, A_NAMESPACE, "tailEnd") {
        if let Some(kind) = tail.attribute("type") {
            connector.arrow.kind = kind.to_string();
        }
        if let Some(len) = tail.attribute("len") {
            connector.arrow.size = match len {
                "sm" => "small",
                "lg" => "large",
                _ => "medium",
            }
            .to_string();
        }
    }
}

fn apply_node(sp: &Node, style: &mut FlowchartStyle) {
    let node = &mut style.node;

    if let Some(sp_pr) = child(sp, P_NAMESPACE, "spPr") {
        if let Some(prst) = child(&sp_pr, A_NAMESPACE, "prstGeom").and_then(|g| g.attribute("prst")) {
            node.shape = match prst {
                "roundRect" => "rounded_rectangle".to_string(),
                "rect" => "rectangle".to_string(),
                other => other.to_string(),
            };
        }

        match child(&sp_pr, A_NAMESPACE, "solidFill").and_then(|fill| parse_solid_fill(&fill)) {
            Some(color) if color.kind == ColorKind::Rgb => {
                node.fill = Some(color.value.to_uppercase());
                node.fill_theme = None;
            }
            Some(color) => {
                node.fill_theme = Some(theme_name(&color.value));
                node.fill_brightness = color.brightness().filter(|b| *b != 0.0).map(|b| round_to(b, 2));
            }
            None => {}
        }

        if let Some(width) = child(&sp_pr, A_NAMESPACE, "ln")
            .and_then(|ln| ln.attribute("w"))
            .and_then(|w| w.parse::<i64>().ok())
            .filter(|w| *w > 0)
        {
            node.border_width_pt = round_to(emu_to_pt(width), 1);
        }

        if let Some(effects) = child(&sp_pr, A_NAMESPACE, "effectLst") {
            match child(&effects, A_NAMESPACE, "outerShdw") {
                Some(shadow) => {
                    node.shadow.enabled = true;
                    if let Some(blur) = shadow.attribute("blurRad").and_then(|v| v.parse::<i64>().ok()) {
                        node.shadow.blur_pt = round_to(emu_to_pt(blur), 1);
                    }
                    if let Some(dist) = shadow.attribute("dist").and_then(|v| v.parse::<i64>().ok()) {
                        node.shadow.distance_pt = round_to(emu_to_pt(dist), 1);
                    }
                    if let Some(dir) = shadow.attribute("dir").and_then(|v| v.parse::<f64>().ok()) {
                        node.shadow.direction_deg = round_to(dir / OOXML_DEGREE, 1);
                    }
                    if let Some(alpha) = first_descendant(&shadow, A_NAMESPACE, "alpha").and_then(|a| int_attr(&a, "val")) {
                        node.shadow.opacity = round_to(f64::from(alpha) / OOXML_PERCENT, 2);
                    }
                }
                None => node.shadow.enabled = false,
            }
        }
    }

    let Some(r_pr) = child(sp, P_NAMESPACE, "txBody")
        .and_then(|body| child(&body, A_NAMESPACE, "p"))
        .and_then(|p| child(&p, A_NAMESPACE, "r"))
        .and_then(|r| child(&r, A_NAMESPACE, "rPr"))
    else {
        return;
    };

    if let Some(size) = r_pr.attribute("sz").and_then(|sz| sz.parse::<f64>().ok()) {
        node.text.font_size_pt = (size / 100.0).trunc();
    }
    node.text.bold = is_true(r_pr.attribute("b"));

    match child(&r_pr, A_NAMESPACE, "solidFill").and_then(|fill| parse_solid_fill(&fill)) {
        Some(color) if color.kind == ColorKind::Rgb => node.text.color = Some(color.value.to_uppercase()),
        Some(color) => node.text.color_theme = Some(theme_name(&color.value)),
        None => {}
    }
}

/// An auto shape is a `<p:sp>` with preset geometry that is neither a
/// placeholder nor a text box.
fn is_auto_shape(sp: &Node) -> bool {
    let Some(nv_sp_pr) = child(sp, P_NAMESPACE, "nvSpPr") else {
        return false;
    };
    let is_placeholder = child(&nv_sp_pr, P_NAMESPACE, "nvPr").is_some_and(|nv_pr| child(&nv_pr, P_NAMESPACE, "ph").is_some());
    let is_text_box = child(&nv_sp_pr, P_NAMESPACE, "cNvSpPr").is_some_and(|c| is_true(c.attribute("txBox")));
    let has_preset = child(sp, P_NAMESPACE, "spPr").is_some_and(|sp_pr| child(&sp_pr, A_NAMESPACE, "prstGeom").is_some());

    !is_placeholder && !is_text_box && has_preset
}

fn shape_name<'a>(shape: &Node<'a, '_>) -> &'a str {
    shape
        .children()
        .find(|n| n.is_element() && n.tag_name().name().starts_with("nv"))
        .and_then(|nv| child(&nv, P_NAMESPACE, "cNvPr"))
        .and_then(|c_nv_pr| c_nv_pr.attribute("name"))
        .unwrap_or("")
}

fn find_sp_tree<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    let root = doc.root_element();
    let c_sld = child(&root, P_NAMESPACE, "cSld").ok_or(Error::ParseError("No <p:cSld> tag was found"))?;
    child(&c_sld, P_NAMESPACE, "spTree").ok_or(Error::ParseError("No <p:spTree> tag was found"))
}

fn connector_kind(prst: &str) -> &'static str {
    if prst.starts_with("bentConnector") {
        "elbow"
    } else if prst.starts_with("curvedConnector") {
        "curved"
    } else {
        "straight"
    }
}

fn anchor_name(anchor: &str) -> Option<&'static str> {
    match anchor {
        "t" => Some("top"),
        "ctr" => Some("middle"),
        "b" => Some("bottom"),
        _ => None,
    }
}

fn align_name(algn: &str) -> Option<&'static str> {
    match algn {
        "l" => Some("left"),
        "ctr" => Some("center"),
        "r" => Some("right"),
        "just" => Some("justify"),
        _ => None,
    }
}

/// Normalizes a scheme name; names outside the known slots collapse to `bg1`.
fn theme_name(value: &str) -> String {
    ThemeColor::from_name_or_default(value).as_str().to_string()
}

fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMU_PER_POINT as f64
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn is_a(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(A_NAMESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_parse_table_header() {
        let style = parse_table_style(&load_xml("slide_table.xml")).unwrap();
        let header = &style.header;
        assert_eq!(header.fill_theme, "bg1");
        assert_eq!(header.fill_brightness, -0.5);
        assert_eq!(header.fill_rgb, None);
        assert_eq!(header.text_color_theme, "lt1");
        assert_eq!(header.text_color_brightness, 0.0);
        assert_eq!(header.font_size_pt, 14.0);
        assert!(header.font_bold);
        assert_eq!(header.font_family, "Meiryo");
        assert_eq!(header.vertical_align, "middle");
        assert_eq!(header.horizontal_align, "center");
        assert_eq!(header.margin_left_emu, 72_000);
    }

    #[test]
    fn test_parse_table_body_columns() {
        let style = parse_table_style(&load_xml("slide_table.xml")).unwrap();
        let body = &style.body;
        assert_eq!(body.fill_theme, "bg1");
        assert_eq!(body.column_brightness, vec![-0.15, -0.05, -0.05]);
        assert_eq!(body.text_color_theme, "tx1");
        assert_eq!(body.text_color_brightness, 0.25);
        assert_eq!(body.font_size_pt, 11.0);
        assert_eq!(body.horizontal_align, "right");
    }

    #[test]
    fn test_slide_without_table_keeps_defaults() {
        let style = parse_table_style(&load_xml("slide_flowchart.xml")).unwrap();
        assert_eq!(style, TableStyle::default());
    }

    #[test]
    fn test_parse_flowchart_prefers_rgb_node() {
        let style = parse_flowchart_style(&load_xml("slide_flowchart.xml")).unwrap();
        let node = &style.node;
        assert_eq!(node.fill.as_deref(), Some("#2E5A88"));
        assert_eq!(node.fill_theme, None);
        assert_eq!(node.shape, "rounded_rectangle");
        assert_eq!(node.border_width_pt, 0.0);
        assert_eq!(node.text.font_size_pt, 12.0);
        assert!(node.text.bold);
        assert_eq!(node.text.color.as_deref(), Some("#FFFFFF"));
        assert!(node.shadow.enabled);
        assert_eq!(node.shadow.blur_pt, 5.0);
        assert_eq!(node.shadow.direction_deg, 45.0);
        assert_eq!(node.shadow.opacity, 0.35);
    }

    #[test]
    fn test_parse_flowchart_connector() {
        let style = parse_flowchart_style(&load_xml("slide_flowchart.xml")).unwrap();
        let connector = &style.connector;
        assert_eq!(connector.kind, "elbow");
        assert_eq!(connector.color_theme, "bg1");
        assert_eq!(connector.color_brightness, -0.35);
        assert_eq!(connector.width_pt, 1.5);
        assert_eq!(connector.dash_style, "dash");
        assert_eq!(connector.arrow.kind, "triangle");
        assert_eq!(connector.arrow.size, "large");
    }

    #[test]
    fn test_connector_after_rgb_node_is_still_read() {
        let xml = br#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Rounded Rectangle 1"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
      <p:spPr><a:prstGeom prst="roundRect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="2E5A88"/></a:solidFill></p:spPr>
    </p:sp>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="3" name="Rectangle 2"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
      <p:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></p:spPr>
    </p:sp>
    <p:cxnSp>
      <p:nvCxnSpPr><p:cNvPr id="4" name="Straight Arrow Connector 3"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>
      <p:spPr><a:prstGeom prst="straightConnector1"><a:avLst/></a:prstGeom><a:ln w="38100"/></p:spPr>
    </p:cxnSp>
  </p:spTree></p:cSld>
</p:sld>"#;
        let style = parse_flowchart_style(xml).unwrap();
        assert_eq!(style.node.fill.as_deref(), Some("#2E5A88"));
        assert_eq!(style.connector.kind, "straight");
        assert_eq!(style.connector.width_pt, 3.0);
    }

    #[test]
    fn test_flowchart_without_shapes_keeps_defaults() {
        let style = parse_flowchart_style(&load_xml("slide_table.xml")).unwrap();
        assert_eq!(style, FlowchartStyle::default());
    }

    #[test]
    fn test_missing_sp_tree() {
        let xml = br#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;
        assert!(matches!(parse_table_style(xml), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(-0.149999, 2), -0.15);
        assert_eq!(round_to(1.04, 1), 1.0);
    }
}
