use crate::format::{FillFormat, Font, LineFormat};
use crate::{Error, Result};

/// The chart types the builders can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    ColumnClustered,
    ColumnStacked,
    BarClustered,
    BarStacked,
    Pie,
    Area,
    AreaStacked,
}

impl ChartKind {
    /// Maps a caller-facing name (`line`, `column`, `bar_stacked`, ...) to a kind.
    /// Matching is case-insensitive; unknown names produce a line chart.
    pub fn from_name(name: &str) -> ChartKind {
        match name.to_ascii_lowercase().as_str() {
            "column" => ChartKind::ColumnClustered,
            "column_stacked" => ChartKind::ColumnStacked,
            "bar" => ChartKind::BarClustered,
            "bar_stacked" => ChartKind::BarStacked,
            "pie" => ChartKind::Pie,
            "area" => ChartKind::Area,
            "area_stacked" => ChartKind::AreaStacked,
            _ => ChartKind::Line,
        }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, ChartKind::Area | ChartKind::AreaStacked)
    }

    pub fn is_pie(&self) -> bool {
        matches!(self, ChartKind::Pie)
    }

    /// Column, bar and area series are styled through their fill.
    pub fn has_filled_series(&self) -> bool {
        matches!(
            self,
            ChartKind::ColumnClustered
                | ChartKind::ColumnStacked
                | ChartKind::BarClustered
                | ChartKind::BarStacked
                | ChartKind::Area
                | ChartKind::AreaStacked
        )
    }

    /// Data-label position used when the template does not name one.
    /// Area charts never get a position.
    pub fn default_label_position(&self) -> Option<LabelPosition> {
        match self {
            ChartKind::Line => Some(LabelPosition::Above),
            ChartKind::ColumnClustered | ChartKind::BarClustered => Some(LabelPosition::OutsideEnd),
            ChartKind::ColumnStacked | ChartKind::BarStacked => Some(LabelPosition::Center),
            ChartKind::Pie => Some(LabelPosition::OutsideEnd),
            ChartKind::Area | ChartKind::AreaStacked => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMark {
    None,
    Inside,
    Outside,
    Cross,
}

impl TickMark {
    /// Accepts the OOXML codes (`none`, `in`, `out`, `cross`) and the long names.
    pub fn from_code(code: &str) -> Option<TickMark> {
        match code {
            "none" => Some(TickMark::None),
            "in" | "inside" => Some(TickMark::Inside),
            "out" | "outside" => Some(TickMark::Outside),
            "cross" => Some(TickMark::Cross),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPosition {
    Above,
    Below,
    Left,
    Right,
    Center,
    InsideBase,
    InsideEnd,
    OutsideEnd,
}

impl LabelPosition {
    pub fn from_code(code: &str) -> Option<LabelPosition> {
        match code {
            "t" => Some(LabelPosition::Above),
            "b" => Some(LabelPosition::Below),
            "l" => Some(LabelPosition::Left),
            "r" => Some(LabelPosition::Right),
            "ctr" => Some(LabelPosition::Center),
            "inBase" => Some(LabelPosition::InsideBase),
            "inEnd" => Some(LabelPosition::InsideEnd),
            "outEnd" => Some(LabelPosition::OutsideEnd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    Bottom,
    Top,
    Right,
    Left,
    Corner,
}

impl LegendPosition {
    /// OOXML `legendPos` codes: `b`, `t`, `r`, `l`, `tr`.
    pub fn from_code(code: &str) -> Option<LegendPosition> {
        match code {
            "b" => Some(LegendPosition::Bottom),
            "t" => Some(LegendPosition::Top),
            "r" => Some(LegendPosition::Right),
            "l" => Some(LegendPosition::Left),
            "tr" => Some(LegendPosition::Corner),
            _ => None,
        }
    }

    /// Names used in the style document (`bottom`, `top`, `right`, `left`, `corner`).
    pub fn from_name(name: &str) -> Option<LegendPosition> {
        match name {
            "bottom" => Some(LegendPosition::Bottom),
            "top" => Some(LegendPosition::Top),
            "right" => Some(LegendPosition::Right),
            "left" => Some(LegendPosition::Left),
            "corner" => Some(LegendPosition::Corner),
            _ => None,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            LegendPosition::Bottom => "bottom",
            LegendPosition::Top => "top",
            LegendPosition::Right => "right",
            LegendPosition::Left => "left",
            LegendPosition::Corner => "corner",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataLabels {
    pub show_value: bool,
    pub position: Option<LabelPosition>,
    pub number_format: Option<String>,
    pub number_format_linked: bool,
    pub font: Font,
}

/// A single data point; pie charts style slices through these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub fill: FillFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    values: Vec<f64>,
    points: Vec<Point>,
    pub fill: FillFormat,
    pub line: LineFormat,
    data_labels: Option<DataLabels>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        let points = vec![Point::default(); values.len()];
        Self {
            name: name.into(),
            values,
            points,
            fill: FillFormat::default(),
            line: LineFormat::default(),
            data_labels: None,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    pub fn has_data_labels(&self) -> bool {
        self.data_labels.is_some()
    }

    /// Enabling keeps existing label settings; disabling drops them.
    pub fn set_has_data_labels(&mut self, enabled: bool) {
        if !enabled {
            self.data_labels = None;
        } else if self.data_labels.is_none() {
            self.data_labels = Some(DataLabels::default());
        }
    }

    pub fn data_labels(&self) -> Option<&DataLabels> {
        self.data_labels.as_ref()
    }

    /// Label settings, enabling labels if they were off.
    pub fn data_labels_mut(&mut self) -> &mut DataLabels {
        self.data_labels.get_or_insert_with(DataLabels::default)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub visible: bool,
    pub major_tick_mark: TickMark,
    pub minor_tick_mark: TickMark,
    pub line: LineFormat,
    pub tick_label_font: Font,
    pub has_major_gridlines: bool,
    pub has_minor_gridlines: bool,
}

impl Axis {
    fn new(has_major_gridlines: bool) -> Self {
        Self {
            visible: true,
            major_tick_mark: TickMark::Outside,
            minor_tick_mark: TickMark::None,
            line: LineFormat::default(),
            tick_label_font: Font::default(),
            has_major_gridlines,
            has_minor_gridlines: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    pub position: LegendPosition,
    pub include_in_layout: bool,
    pub font: Font,
}

/// A category chart: one value per category per series.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    kind: ChartKind,
    categories: Vec<String>,
    series: Vec<Series>,
    category_axis: Option<Axis>,
    value_axis: Option<Axis>,
    legend: Option<Legend>,
}

impl Chart {
    /// Creates a chart the way PowerPoint initializes a fresh one: axes for every
    /// kind except pie, major gridlines on the value axis, no legend.
    pub fn new(kind: ChartKind, categories: Vec<String>, series: Vec<Series>) -> Self {
        let (category_axis, value_axis) = if kind.is_pie() {
            (None, None)
        } else {
            (Some(Axis::new(false)), Some(Axis::new(true)))
        };
        Self { kind, categories, series, category_axis, value_axis, legend: None }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn series_mut(&mut self) -> &mut [Series] {
        &mut self.series
    }

    pub fn category_axis(&self) -> Option<&Axis> {
        self.category_axis.as_ref()
    }

    pub fn value_axis(&self) -> Option<&Axis> {
        self.value_axis.as_ref()
    }

    /// # Errors
    ///
    /// [`Error::Unsupported`] for charts without axes (pie).
    pub fn category_axis_mut(&mut self) -> Result<&mut Axis> {
        self.category_axis.as_mut().ok_or(Error::Unsupported("chart has no category axis"))
    }

    /// # Errors
    ///
    /// [`Error::Unsupported`] for charts without axes (pie).
    pub fn value_axis_mut(&mut self) -> Result<&mut Axis> {
        self.value_axis.as_mut().ok_or(Error::Unsupported("chart has no value axis"))
    }

    pub fn has_legend(&self) -> bool {
        self.legend.is_some()
    }

    pub fn set_has_legend(&mut self, enabled: bool) {
        if !enabled {
            self.legend = None;
        } else if self.legend.is_none() {
            self.legend = Some(Legend::default());
        }
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn legend_mut(&mut self) -> Option<&mut Legend> {
        self.legend.as_mut()
    }
}
