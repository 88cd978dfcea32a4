use crate::container::PptxContainer;
use crate::crtx::extract_crtx_styling;
use crate::document::{serialize, StyleDocument};
use crate::parser_config::ExtractConfig;
use crate::types::StylingRecord;
use crate::Result;
use log::{info, warn};
use std::path::Path;

/// Extracts chart styling from `crtx_path` and table/flowchart styling from the
/// reference deck at `pptx_path` into one [`StylingRecord`].
///
/// # Errors
///
/// A missing or unreadable chart template or deck is an error. A table or
/// flowchart exemplar that cannot be read (missing slide, malformed slide XML)
/// only logs a warning and leaves that section at its defaults.
pub fn extract_styles(crtx_path: &Path, pptx_path: &Path, config: &ExtractConfig) -> Result<StylingRecord> {
    info!("Extracting chart styling from {}", crtx_path.display());
    let mut record = extract_crtx_styling(crtx_path, config)?;
    info!("Found {} series styles, {} data label styles", record.series.len(), record.data_labels.len());

    info!("Extracting table and flowchart styling from {}", pptx_path.display());
    let mut deck = PptxContainer::open(pptx_path)?;

    match deck.extract_table_style(config.table_slide) {
        Ok(table) => record.table_style = table,
        Err(e) => warn!("Table styling unavailable from slide {} ({e}), using defaults", config.table_slide),
    }
    match deck.extract_flowchart_style(config.flowchart_slide) {
        Ok(flowchart) => record.flowchart_style = flowchart,
        Err(e) => warn!("Flowchart styling unavailable from slide {} ({e}), using defaults", config.flowchart_slide),
    }

    Ok(record)
}

/// Runs the whole extraction and writes the canonical style document to `output`.
///
/// Parent directories of `output` are created as needed. The written document
/// is returned.
///
/// # Example
///
/// ```no_run
/// use pptx_style::{extract_and_save, ExtractConfig};
/// use std::path::Path;
///
/// let document = extract_and_save(
///     Path::new("templates/template.crtx"),
///     Path::new("templates/template.pptx"),
///     Path::new("powerpoint/processing/style.yaml"),
///     &ExtractConfig::default(),
/// )?;
/// println!("primary color: {}", document.colors.primary);
/// # Ok::<(), pptx_style::Error>(())
/// ```
pub fn extract_and_save(crtx_path: &Path, pptx_path: &Path, output: &Path, config: &ExtractConfig) -> Result<StyleDocument> {
    let record = extract_styles(crtx_path, pptx_path, config)?;
    let document = serialize(&record);
    document.write(output)?;
    info!("Style document written to {}", output.display());
    Ok(document)
}
