//! Locating and loading the canonical style document.

use crate::chart::LegendPosition;
use crate::color::{RgbColor, ThemeColor};
use crate::constants::{LEGACY_STYLE_DIR, MASTER_TEMPLATES_DIR, PROJECT_STYLE_DIR, STYLE_FILE_NAME};
use crate::document::{ColorType, DataLabelSpec, StyleDocument, DEFAULT_PRIMARY};
use crate::{Error, Result};
use directories::BaseDirs;
use log::{debug, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static PROCESS_CONFIG: OnceCell<Arc<StyleConfig>> = OnceCell::new();

/// Resolves `style.yaml` by a fixed search order.
///
/// 1. an explicit path, if one was given (nothing else is searched then)
/// 2. `<project>/powerpoint/processing/style.yaml`
/// 3. `<project>/processing/style.yaml`
/// 4. `<master>/style.yaml`, where master defaults to `~/.pptx-style/templates`
///
/// The project directory defaults to the current working directory.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    project_dir: Option<PathBuf>,
    master_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    pub fn with_master_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.master_dir = Some(dir.into());
        self
    }

    /// The master templates directory, `~/.pptx-style/templates` unless overridden.
    pub fn master_dir(&self) -> Option<PathBuf> {
        self.master_dir.clone().or_else(|| {
            BaseDirs::new().map(|dirs| MASTER_TEMPLATES_DIR.iter().fold(dirs.home_dir().to_path_buf(), |p, c| p.join(c)))
        })
    }

    /// Every location that would be tried, in order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.path {
            return vec![path.clone()];
        }

        let project = self.project_dir.clone().or_else(|| std::env::current_dir().ok()).unwrap_or_default();
        let mut candidates = vec![
            PROJECT_STYLE_DIR.iter().fold(project.clone(), |p, c| p.join(c)).join(STYLE_FILE_NAME),
            LEGACY_STYLE_DIR.iter().fold(project, |p, c| p.join(c)).join(STYLE_FILE_NAME),
        ];
        if let Some(master) = self.master_dir() {
            candidates.push(master.join(STYLE_FILE_NAME));
        }
        candidates
    }

    /// The first candidate that exists.
    pub fn resolve(&self) -> Result<PathBuf> {
        let searched = self.candidates();
        match searched.iter().find(|path| path.is_file()) {
            Some(found) => Ok(found.clone()),
            None => Err(Error::ConfigurationNotFound { searched }),
        }
    }

    /// Reads and parses the resolved document. Not cached; see [`StyleConfig::load`].
    pub fn load(&self) -> Result<StyleConfig> {
        let path = self.resolve()?;
        StyleConfig::from_path(&path)
    }
}

/// Typed access to the canonical style document.
///
/// Every accessor has a built-in fallback, so a partial or hand-edited document
/// never makes a builder fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleConfig {
    document: StyleDocument,
    source: Option<PathBuf>,
}

impl StyleConfig {
    /// The process-wide configuration, loaded on first use by the default search order.
    ///
    /// Every later call returns the same `Arc`, so one generation run uses a single
    /// style snapshot even if `style.yaml` changes on disk meanwhile.
    pub fn load() -> Result<Arc<StyleConfig>> {
        Self::load_with(&ConfigLoader::new())
    }

    /// Like [`StyleConfig::load`], but resolves with `loader` if nothing is cached yet.
    /// Once cached, `loader` is ignored.
    pub fn load_with(loader: &ConfigLoader) -> Result<Arc<StyleConfig>> {
        PROCESS_CONFIG.get_or_try_init(|| loader.load().map(Arc::new)).cloned()
    }

    pub fn from_document(document: StyleDocument) -> Self {
        Self { document, source: None }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        StyleDocument::from_yaml_str(yaml).map(Self::from_document)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&yaml)?;
        info!("Loaded style configuration from {}", path.display());
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn document(&self) -> &StyleDocument {
        &self.document
    }

    /// The file this configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn primary(&self) -> RgbColor {
        Self::hex_to_rgb(&self.document.colors.primary)
            .or_else(|_| Self::hex_to_rgb(DEFAULT_PRIMARY))
            .unwrap_or(RgbColor::new(0x4F, 0x4F, 0x70))
    }

    /// Body fill brightness for `column`; columns past the list reuse its last entry.
    pub fn body_brightness(&self, column: usize) -> f64 {
        let brightness = &self.document.table.body.column_brightness;
        brightness.get(column).or_else(|| brightness.last()).copied().unwrap_or(-0.05)
    }

    pub fn legend_position(&self) -> LegendPosition {
        LegendPosition::from_name(&self.document.legend.position).unwrap_or_default()
    }

    /// RGB color of series `index`, or the primary color if that entry is missing or not RGB.
    pub fn series_rgb(&self, index: usize) -> RgbColor {
        self.document
            .colors
            .series
            .get(index)
            .filter(|spec| spec.kind == ColorType::Rgb)
            .and_then(|spec| Self::hex_to_rgb(&spec.value).ok())
            .unwrap_or_else(|| self.primary())
    }

    /// Theme color and brightness of series `index`; `bg1` at 0 if the entry is missing or not a theme color.
    pub fn series_theme(&self, index: usize) -> (ThemeColor, f64) {
        match self.document.colors.series.get(index) {
            Some(spec) if spec.kind == ColorType::Theme => {
                (Self::theme_color(&spec.value), spec.brightness.unwrap_or(0.0))
            }
            _ => (ThemeColor::Background1, 0.0),
        }
    }

    /// Data-label style for series `index`, falling back to entry 0, then to labels off.
    pub fn data_label_style(&self, index: usize) -> DataLabelSpec {
        let labels = &self.document.data_labels;
        labels.get(index).or_else(|| labels.first()).cloned().unwrap_or_default()
    }

    /// Unknown names resolve to `bg1`.
    pub fn theme_color(name: &str) -> ThemeColor {
        let theme = ThemeColor::from_name_or_default(name);
        if theme == ThemeColor::Background1 && name != "bg1" {
            debug!("Theme color '{name}' not recognized, using bg1");
        }
        theme
    }

    pub fn hex_to_rgb(hex: &str) -> Result<RgbColor> {
        RgbColor::from_hex(hex)
    }
}
