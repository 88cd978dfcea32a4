//! Builds a table, a chart and a box diagram with the project's style document.
//!
//! Run with: cargo run --example build_slide <template.crtx> [style.yaml]
//!
//! Without an explicit style file the usual search order applies
//! (`powerpoint/processing/style.yaml`, `processing/style.yaml`, then the master templates).

use pptx_style::{
    ChartSpec, ConfigLoader, DiagramSpec, NativeBuilder, NodeSpec, PlaceholderKind, Rect, Result, SeriesSpec, ShapeKind,
    Slide, StyleConfig, TableSpec,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let Some(crtx) = args.get(1) else {
        eprintln!("Usage: cargo run --example build_slide <template.crtx> [style.yaml]");
        return Ok(());
    };

    let mut loader = ConfigLoader::new();
    if let Some(style) = args.get(2) {
        loader = loader.with_path(style);
    }
    let config = StyleConfig::load_with(&loader)?;
    let builder = NativeBuilder::new(config).with_chart_template(Path::new(crtx))?;

    let mut slide = Slide::new();
    let table_area = slide.add_placeholder(PlaceholderKind::Object, 1, Rect::from_inches(0.5, 1.2, 6.0, 2.5));
    let chart_area = slide.add_placeholder(PlaceholderKind::Chart, 2, Rect::from_inches(6.8, 1.2, 6.0, 2.5));
    let diagram_area = slide.add_placeholder(PlaceholderKind::Body, 3, Rect::from_inches(0.5, 4.0, 12.3, 3.0));

    let rows = [["Region", "2023", "2024"], ["East", "1200万", "1350万"], ["West", "980万", "1010万"]];
    let data: Vec<Vec<String>> = rows.iter().map(|row| row.iter().map(|cell| cell.to_string()).collect()).collect();
    builder.build_table(&mut slide, table_area, &TableSpec::new(data))?;

    let chart = ChartSpec {
        chart_kind: "column".to_string(),
        categories: vec!["2023".to_string(), "2024".to_string()],
        series: vec![
            SeriesSpec { name: Some("East".to_string()), values: vec![1200.0.into(), 1350.0.into()] },
            SeriesSpec { name: Some("West".to_string()), values: vec![980.0.into(), 1010.0.into()] },
        ],
    };
    builder.build_chart(&mut slide, chart_area, &chart)?;

    let node = |text: &str, x: f64| NodeSpec { text: text.to_string(), position: Some((x, 0.5)), width: None, height: None };
    let diagram = DiagramSpec { nodes: vec![node("Collect", 0.2), node("Analyze", 0.5), node("Report", 0.8)] };
    builder.build_diagram(&mut slide, diagram_area, &diagram)?;

    for shape in slide.shapes() {
        match &shape.kind {
            ShapeKind::Table(table) => println!("{}: {} chars of table XML", shape.name, table.to_xml().len()),
            ShapeKind::Chart(chart) => println!("{}: {:?} chart, {} series", shape.name, chart.kind(), chart.series().len()),
            ShapeKind::AutoShape(node) => println!("{}: '{}'", shape.name, node.text),
            ShapeKind::Placeholder(_) => println!("{}: placeholder", shape.name),
        }
    }

    Ok(())
}
