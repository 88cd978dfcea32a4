use crate::parse_rels::parse_slide_order;
use crate::parse_xml::{parse_flowchart_style, parse_table_style};
use crate::types::{FlowchartStyle, TableStyle};
use crate::{Error, Result};
use log::{debug, warn};
use std::io::Read;
use std::path::Path;

/// Holds an opened reference deck (`.pptx`).
///
/// `PptxContainer` resolves the presentation's slide order once on open and
/// gives 1-based access to the slide parts, which is how exemplar slides are
/// addressed when extracting table and flowchart styling.
pub struct PptxContainer {
    archive: zip::ZipArchive<std::fs::File>,
    pub slide_paths: Vec<String>,
    pub slide_count: usize,
}

impl PptxContainer {
    /// Opens a PowerPoint pptx file and resolves its slide order.
    ///
    /// The order comes from `<p:sldIdLst>` in `ppt/presentation.xml`. Decks whose
    /// presentation part cannot be read fall back to the numeric order of the
    /// `ppt/slides/slideN.xml` part names.
    ///
    /// # Errors
    ///
    /// Errors are returned on file access problems or if the file is not a zip archive.
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let archive = zip::ZipArchive::new(file)?;

        let mut container = Self { archive, slide_paths: Vec::new(), slide_count: 0 };
        container.slide_paths = container.resolve_slide_paths();
        container.slide_count = container.slide_paths.len();

        debug!("Opened {} with {} slides", path.display(), container.slide_count);
        Ok(container)
    }

    fn resolve_slide_paths(&mut self) -> Vec<String> {
        match self.ordered_slide_paths() {
            Ok(paths) if !paths.is_empty() => paths,
            Ok(_) => self.slide_paths_by_name(),
            Err(e) => {
                warn!("Could not resolve slide order from presentation part ({e}), sorting by part name");
                self.slide_paths_by_name()
            }
        }
    }

    fn ordered_slide_paths(&mut self) -> Result<Vec<String>> {
        let presentation = self.read_file_from_archive("ppt/presentation.xml")?;
        let rels = self.read_file_from_archive("ppt/_rels/presentation.xml.rels")?;
        parse_slide_order(&presentation, &rels)
    }

    fn slide_paths_by_name(&self) -> Vec<String> {
        let mut numbered: Vec<(u32, String)> = self
            .archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
            .filter_map(|name| extract_slide_number(name).map(|n| (n, name.to_string())))
            .collect();

        numbered.sort();
        numbered.into_iter().map(|(_, name)| name).collect()
    }

    /// Returns the XML of the slide at `number` (1-based, presentation order).
    ///
    /// # Errors
    ///
    /// [`Error::SlideNotFound`] if the deck has fewer slides.
    pub fn slide_xml(&mut self, number: usize) -> Result<Vec<u8>> {
        let path = number
            .checked_sub(1)
            .and_then(|idx| self.slide_paths.get(idx))
            .cloned()
            .ok_or(Error::SlideNotFound(number))?;
        self.read_file_from_archive(&path)
    }

    /// Reads the table exemplar on slide `number` into a [`TableStyle`].
    pub fn extract_table_style(&mut self, number: usize) -> Result<TableStyle> {
        let xml = self.slide_xml(number)?;
        parse_table_style(&xml)
    }

    /// Reads the flowchart exemplar shapes on slide `number` into a [`FlowchartStyle`].
    pub fn extract_flowchart_style(&mut self, number: usize) -> Result<FlowchartStyle> {
        let xml = self.slide_xml(number)?;
        parse_flowchart_style(&xml)
    }

    /// Reads a file from the PPTX archive by its internal path.
    ///
    /// # Errors
    ///
    /// [`Error::PartNotFound`] if no part has that name.
    pub fn read_file_from_archive(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Err(Error::PartNotFound(path.to_string())),
            Err(e) => return Err(e.into()),
        };
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }
}

/// `ppt/slides/slide12.xml` -> `12`
fn extract_slide_number(path: &str) -> Option<u32> {
    path.rsplit('/')
        .next()?
        .strip_prefix("slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(extract_slide_number("ppt/slides/slideLayout1.xml"), None);
        assert_eq!(extract_slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
    }
}
