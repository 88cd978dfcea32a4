#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

pub fn load_xml(filename: &str) -> Vec<u8> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("test_data");
    path.push("xml");
    path.push(filename);
    fs::read(path).expect("Unable to read test data file")
}

/// Writes a zip archive with the given `(part name, content)` entries.
pub fn write_archive(path: &Path, entries: &[(&str, Vec<u8>)]) -> PathBuf {
    let file = File::create(path).expect("Unable to create archive");
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).expect("Unable to start archive entry");
        writer.write_all(content).expect("Unable to write archive entry");
    }
    writer.finish().expect("Unable to finish archive");
    path.to_path_buf()
}

pub fn write_crtx(dir: &Path) -> PathBuf {
    write_archive(&dir.join("template.crtx"), &[("chart/chart.xml", load_xml("chart.xml"))])
}

/// A deck whose presentation order is slide2.xml (table), slide1.xml (flowchart), slide10.xml.
pub fn write_deck(dir: &Path) -> PathBuf {
    write_archive(
        &dir.join("template.pptx"),
        &[
            ("ppt/presentation.xml", load_xml("presentation.xml")),
            ("ppt/_rels/presentation.xml.rels", load_xml("presentation.xml.rels")),
            ("ppt/slides/slide1.xml", load_xml("slide_flowchart.xml")),
            ("ppt/slides/slide2.xml", load_xml("slide_table.xml")),
            ("ppt/slides/slide10.xml", load_xml("slide_table.xml")),
        ],
    )
}
