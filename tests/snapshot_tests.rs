// Runs in its own test binary: the generation snapshot is taken once per process.

use pptx_style::{
    snapshot_dir, snapshot_info, ChartSpec, Error, NativeBuilder, PlaceholderKind, Rect, SeriesSpec, Slide, StyleConfig,
    TableSpec,
};
use std::fs;
use std::sync::Arc;

#[test]
fn test_rejected_builds_leave_no_snapshot() {
    let project = tempfile::tempdir().unwrap();
    let master = tempfile::tempdir().unwrap();
    fs::write(master.path().join("style.yaml"), "colors: {}\n").unwrap();

    let builder =
        NativeBuilder::new(Arc::new(StyleConfig::default())).with_snapshot(project.path(), master.path());
    let mut slide = Slide::new();
    let body = slide.add_placeholder(PlaceholderKind::Object, 1, Rect::from_inches(1.0, 1.0, 8.0, 4.0));

    let ragged = TableSpec::new(vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
    assert!(matches!(builder.build_table(&mut slide, body, &ragged), Err(Error::Validation(_))));

    let empty_chart = ChartSpec {
        chart_kind: "column".to_string(),
        categories: Vec::new(),
        series: vec![SeriesSpec { name: None, values: vec![1.0.into()] }],
    };
    assert!(matches!(builder.build_chart(&mut slide, body, &empty_chart), Err(Error::Validation(_))));

    assert!(!snapshot_dir(project.path()).exists());

    let table = TableSpec::new(vec![vec!["a".to_string(), "b".to_string()]]);
    builder.build_table(&mut slide, body, &table).unwrap();

    let info = snapshot_info(project.path()).unwrap();
    assert!(info.files.contains(&"style.yaml".to_string()));
    assert!(info.timestamp.is_some());
}
