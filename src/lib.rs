//! Extracts visual styling from a PowerPoint chart template (`.crtx`) and a
//! reference deck (`.pptx`) into one canonical style document, then replays that
//! style onto freshly built tables, charts and box diagrams.
//!
//! The flow is:
//!
//! 1. [`extract_crtx_styling`] and [`PptxContainer`] read the template artifacts
//!    into a [`StylingRecord`], a [`TableStyle`] and a [`FlowchartStyle`].
//! 2. [`serialize`] turns those into a [`StyleDocument`], which is written as YAML.
//! 3. [`StyleConfig::load`] reads the document back (once per process).
//! 4. [`NativeBuilder`] builds styled shapes on a [`Slide`], invoking
//!    [`apply_chart_styling`] for every chart it creates.

mod applier;
mod builders;
mod chart;
mod color;
mod config;
mod constants;
mod container;
mod crtx;
mod document;
mod format;
mod parse_rels;
mod parse_xml;
mod parser_config;
mod pipeline;
mod slide;
mod snapshot;
mod table;
mod types;

use std::path::PathBuf;

pub use applier::{apply_chart_styling, ApplyReport, StyleWarning};
pub use builders::NativeBuilder;
pub use chart::{Axis, Chart, ChartKind, DataLabels, LabelPosition, Legend, LegendPosition, Point, Series, TickMark};
pub use color::{brightness, brightness_to_lum_mod, RgbColor, ThemeColor};
pub use config::{ConfigLoader, StyleConfig};
pub use constants::{EMU_PER_INCH, EMU_PER_POINT};
pub use container::PptxContainer;
pub use crtx::{extract_crtx_styling, parse_chart_xml};
pub use document::*;
pub use format::{ColorFormat, ColorValue, DashStyle, FillFormat, FillType, Font, HorizontalAlign, LineFormat, VerticalAnchor};
pub use parser_config::{ExtractConfig, ExtractConfigBuilder};
pub use pipeline::{extract_and_save, extract_styles};
pub use slide::{AutoShape, Placeholder, PlaceholderKind, Rect, Shape, ShapeId, ShapeKind, Slide};
pub use snapshot::{create_generation_snapshot, snapshot_dir, snapshot_info, SnapshotInfo};
pub use table::{Border, Cell, CellBorders, Table};
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error(
        "style.yaml not found (searched: {}). Please run:\n  \
         mkdir -p powerpoint/processing\n  \
         cp <master templates dir>/style.yaml powerpoint/processing/\n\
         Or generate it with:\n  \
         cargo run --example extract_style -- <template.crtx> <template.pptx> powerpoint/processing/style.yaml",
        .searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    ConfigurationNotFound { searched: Vec<PathBuf> },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Slide {0} not found")]
    SlideNotFound(usize),

    #[error("Part not found in archive: {0}")]
    PartNotFound(String),

    #[error("Shape {0} not found on slide")]
    ShapeNotFound(ShapeId),

    #[error("Unknown theme color '{0}'")]
    UnknownThemeColor(String),

    #[error("Invalid color value '{0}'")]
    InvalidColor(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Parse error: {0}")]
    ParseError(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
