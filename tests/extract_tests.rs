mod common;

use common::{load_xml, write_archive, write_crtx, write_deck};
use pptx_style::{
    extract_and_save, extract_crtx_styling, extract_styles, ColorType, Error, ExtractConfig, FlowchartStyle, PptxContainer,
    StyleConfig, StyleDocument, TableStyle,
};

#[test]
fn test_extract_and_save_writes_reloadable_document() {
    let dir = tempfile::tempdir().unwrap();
    let crtx = write_crtx(dir.path());
    let deck = write_deck(dir.path());
    let output = dir.path().join("powerpoint").join("processing").join("style.yaml");

    let document = extract_and_save(&crtx, &deck, &output, &ExtractConfig::default()).unwrap();
    assert!(output.is_file());

    assert_eq!(document.colors.primary, "#4F4F70");
    assert_eq!(document.colors.series.len(), 2);
    assert_eq!(document.colors.series[1].kind, ColorType::Theme);
    assert_eq!(document.legend.position, "bottom");
    assert_eq!(document.category_axis.font.color.brightness, Some(0.35));

    // slide 1 in presentation order is slide2.xml, the table exemplar
    assert_eq!(document.table.header.font_family, "Meiryo");
    assert_eq!(document.table.body.column_brightness, vec![-0.15, -0.05, -0.05]);
    assert_eq!(document.flowchart.node.fill.as_deref(), Some("#2E5A88"));
    assert_eq!(document.flowchart.connector.kind, "elbow");
    assert_eq!(document.diagram.node.fill, "#4F4F70");

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with('#'));
    assert_eq!(StyleDocument::from_yaml_str(&text).unwrap(), document);
}

#[test]
fn test_brightness_survives_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let crtx = write_crtx(dir.path());
    let deck = write_deck(dir.path());
    let output = dir.path().join("style.yaml");

    extract_and_save(&crtx, &deck, &output, &ExtractConfig::default()).unwrap();
    let raw = extract_crtx_styling(&crtx, &ExtractConfig::default()).unwrap();
    let reloaded = StyleConfig::from_path(&output).unwrap();
    let document = reloaded.document();

    for (idx, series) in raw.series.iter().enumerate() {
        let expected = series.fill.as_ref().and_then(|fill| fill.brightness());
        assert_eq!(document.colors.series[idx].brightness, expected, "series {idx}");
    }

    let axis_line = raw.category_axis.as_ref().and_then(|axis| axis.line_color.as_ref()).unwrap();
    assert_eq!(document.category_axis.line.color.brightness, axis_line.brightness());
    let legend_font = raw.legend.as_ref().and_then(|legend| legend.font_color.as_ref()).unwrap();
    assert_eq!(document.legend.font.color.brightness, legend_font.brightness());
    assert_eq!(reloaded.series_theme(1).1, -0.25);
}

#[test]
fn test_missing_exemplar_slides_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let crtx = write_crtx(dir.path());
    let deck = write_deck(dir.path());
    let config = ExtractConfig::builder().table_slide(9).flowchart_slide(0).build();

    let record = extract_styles(&crtx, &deck, &config).unwrap();
    assert_eq!(record.table_style, TableStyle::default());
    assert_eq!(record.flowchart_style, FlowchartStyle::default());
    assert_eq!(record.series.len(), 2);
}

#[test]
fn test_missing_inputs_are_hard_errors() {
    let dir = tempfile::tempdir().unwrap();
    let crtx = write_crtx(dir.path());
    let deck = write_deck(dir.path());
    let missing = dir.path().join("missing.pptx");
    let output = dir.path().join("style.yaml");

    assert!(matches!(
        extract_and_save(&missing, &deck, &output, &ExtractConfig::default()),
        Err(Error::Io(_))
    ));
    assert!(matches!(
        extract_and_save(&crtx, &missing, &output, &ExtractConfig::default()),
        Err(Error::Io(_))
    ));
    assert!(!output.exists());
}

#[test]
fn test_crtx_without_chart_part() {
    let dir = tempfile::tempdir().unwrap();
    let crtx = write_archive(&dir.path().join("empty.crtx"), &[("[Content_Types].xml", b"<Types/>".to_vec())]);

    let result = extract_crtx_styling(&crtx, &ExtractConfig::default());
    assert!(matches!(result, Err(Error::PartNotFound(part)) if part == "chart/chart.xml"));
}

#[test]
fn test_slide_order_without_presentation_part() {
    let dir = tempfile::tempdir().unwrap();
    let deck = write_archive(
        &dir.path().join("bare.pptx"),
        &[
            ("ppt/slides/slide10.xml", load_xml("slide_table.xml")),
            ("ppt/slides/slide2.xml", load_xml("slide_flowchart.xml")),
            ("ppt/slides/slide1.xml", load_xml("slide_table.xml")),
        ],
    );

    let mut container = PptxContainer::open(&deck).unwrap();
    assert_eq!(container.slide_paths, vec!["ppt/slides/slide1.xml", "ppt/slides/slide2.xml", "ppt/slides/slide10.xml"]);
    assert_eq!(container.extract_flowchart_style(2).unwrap().node.fill.as_deref(), Some("#2E5A88"));
    assert!(matches!(container.slide_xml(4), Err(Error::SlideNotFound(4))));
}

#[test]
fn test_container_follows_presentation_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut container = PptxContainer::open(&write_deck(dir.path())).unwrap();

    assert_eq!(container.slide_count, 3);
    assert_eq!(container.slide_paths[0], "ppt/slides/slide2.xml");
    assert_eq!(container.extract_table_style(1).unwrap().header.font_size_pt, 14.0);
}
