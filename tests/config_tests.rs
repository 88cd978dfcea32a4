use pptx_style::{ConfigLoader, Error, LegendPosition, StyleConfig};
use std::fs;
use std::path::Path;

fn write_style(dir: &Path, yaml: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("style.yaml"), yaml).unwrap();
}

#[test]
fn test_project_location_wins_over_legacy_and_master() {
    let project = tempfile::tempdir().unwrap();
    let master = tempfile::tempdir().unwrap();
    write_style(&project.path().join("powerpoint").join("processing"), "colors:\n  primary: '#111111'\n");
    write_style(&project.path().join("processing"), "colors:\n  primary: '#222222'\n");
    write_style(master.path(), "colors:\n  primary: '#333333'\n");

    let loader = ConfigLoader::new().with_project_dir(project.path()).with_master_dir(master.path());
    let config = loader.load().unwrap();
    assert_eq!(config.document().colors.primary, "#111111");
    assert_eq!(config.source(), Some(project.path().join("powerpoint/processing/style.yaml").as_path()));
}

#[test]
fn test_legacy_then_master_locations() {
    let project = tempfile::tempdir().unwrap();
    let master = tempfile::tempdir().unwrap();
    write_style(master.path(), "colors:\n  primary: '#333333'\n");

    let loader = ConfigLoader::new().with_project_dir(project.path()).with_master_dir(master.path());
    assert_eq!(loader.resolve().unwrap(), master.path().join("style.yaml"));

    write_style(&project.path().join("processing"), "colors:\n  primary: '#222222'\n");
    assert_eq!(loader.load().unwrap().document().colors.primary, "#222222");
}

#[test]
fn test_not_found_lists_every_location() {
    let project = tempfile::tempdir().unwrap();
    let master = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::new().with_project_dir(project.path()).with_master_dir(master.path());

    let err = loader.load().unwrap_err();
    let message = err.to_string();
    match err {
        Error::ConfigurationNotFound { searched } => assert_eq!(searched.len(), 3),
        other => panic!("unexpected error: {other}"),
    }
    assert!(message.contains("mkdir -p powerpoint/processing"));
    assert!(message.contains(&master.path().join("style.yaml").display().to_string()));
}

#[test]
fn test_explicit_path_is_the_only_candidate() {
    let project = tempfile::tempdir().unwrap();
    write_style(&project.path().join("powerpoint").join("processing"), "colors: {}\n");
    let explicit = project.path().join("custom.yaml");

    let loader = ConfigLoader::new().with_project_dir(project.path()).with_path(&explicit);
    assert!(matches!(loader.load(), Err(Error::ConfigurationNotFound { .. })));

    fs::write(&explicit, "legend:\n  position: top\n").unwrap();
    assert_eq!(loader.load().unwrap().legend_position(), LegendPosition::Top);
}

#[test]
fn test_hand_edited_document_keeps_defaults() {
    let yaml = "\
# trimmed by hand
colors:
  primary: '#2E5A88'
table:
  body:
    column_brightness: [-0.2]
";
    let config = StyleConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.legend_position(), LegendPosition::Bottom);
    assert_eq!(config.body_brightness(3), -0.2);
    assert_eq!(config.document().table.header.fill_brightness, -0.5);
    assert_eq!(config.document().value_axis.tick_marks, "none");
    assert_eq!(config.document().diagram.node.font_size_pt, 12.0);
    assert!(!config.data_label_style(0).show_value);
}

#[test]
fn test_invalid_yaml_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_style(dir.path(), "colors: [\n");
    let result = StyleConfig::from_path(&dir.path().join("style.yaml"));
    assert!(matches!(result, Err(Error::Yaml(_))));
}
