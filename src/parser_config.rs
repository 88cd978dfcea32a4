/// Configuration options for style extraction.
///
/// Use [`ExtractConfig::builder()`] to create a configuration instance.
/// This allows you to customize only the desired fields while falling back to sensible defaults for the rest.
///
/// # Configuration Options
///
/// | Parameter | Type | Default | Description |
/// |-----------|------|---------|-------------|
/// | `chart_part` | `String` | `chart/chart.xml` | Path of the chart part inside the `.crtx` archive |
/// | `table_slide` | `usize` | `1` | Slide number (1-based) holding the exemplar table |
/// | `flowchart_slide` | `usize` | `2` | Slide number (1-based) holding the exemplar flowchart shapes |
///
/// # Example
///
/// ```
/// use pptx_style::ExtractConfig;
///
/// let config = ExtractConfig::builder()
///     .table_slide(3)
///     .build();
/// assert_eq!(config.flowchart_slide, 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    pub chart_part: String,
    pub table_slide: usize,
    pub flowchart_slide: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            chart_part: "chart/chart.xml".to_string(),
            table_slide: 1,
            flowchart_slide: 2,
        }
    }
}

impl ExtractConfig {
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }
}

/// Builder for [`ExtractConfig`].
///
/// Allows setting individual configuration fields while falling back to defaults for any unspecified values
#[derive(Debug, Default)]
pub struct ExtractConfigBuilder {
    chart_part: Option<String>,
    table_slide: Option<usize>,
    flowchart_slide: Option<usize>,
}

impl ExtractConfigBuilder {
    /// Sets the archive path of the chart part inside the chart template.
    pub fn chart_part(mut self, value: impl Into<String>) -> Self {
        self.chart_part = Some(value.into());
        self
    }

    /// Sets the 1-based slide number the table exemplar is read from.
    pub fn table_slide(mut self, value: usize) -> Self {
        self.table_slide = Some(value);
        self
    }

    /// Sets the 1-based slide number the flowchart exemplar is read from.
    pub fn flowchart_slide(mut self, value: usize) -> Self {
        self.flowchart_slide = Some(value);
        self
    }

    /// Builds the final [`ExtractConfig`] instance, applying default values for any fields that were not set.
    pub fn build(self) -> ExtractConfig {
        let defaults = ExtractConfig::default();
        ExtractConfig {
            chart_part: self.chart_part.unwrap_or(defaults.chart_part),
            table_slide: self.table_slide.unwrap_or(defaults.table_slide),
            flowchart_slide: self.flowchart_slide.unwrap_or(defaults.flowchart_slide),
        }
    }
}
