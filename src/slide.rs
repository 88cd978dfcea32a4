use crate::chart::Chart;
use crate::constants::EMU_PER_INCH;
use crate::format::{FillFormat, Font, HorizontalAlign, LineFormat, VerticalAnchor};
use crate::table::Table;
use crate::{Error, Result};
use log::debug;
use std::fmt;

/// Slide-unique shape identifier (`<p:cNvPr id="..">`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self { left, top, width, height }
    }

    pub fn from_inches(left: f64, top: f64, width: f64, height: f64) -> Self {
        let emu = |inches: f64| (inches * EMU_PER_INCH as f64).round() as i64;
        Self { left: emu(left), top: emu(top), width: emu(width), height: emu(height) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Title,
    Body,
    Object,
    Table,
    Chart,
    Picture,
}

impl PlaceholderKind {
    pub fn accepts_table(&self) -> bool {
        matches!(self, PlaceholderKind::Object | PlaceholderKind::Table)
    }

    pub fn accepts_chart(&self) -> bool {
        matches!(self, PlaceholderKind::Object | PlaceholderKind::Chart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// Layout placeholder index (`<p:ph idx="..">`).
    pub idx: u32,
}

/// A preset-geometry shape with a single text paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoShape {
    /// DrawingML preset (`roundRect`, `rect`, ...).
    pub preset: String,
    pub fill: FillFormat,
    pub line: LineFormat,
    pub text: String,
    pub font: Font,
    pub vertical_anchor: VerticalAnchor,
    pub horizontal_align: HorizontalAlign,
}

impl AutoShape {
    pub fn new(preset: impl Into<String>) -> Self {
        Self {
            preset: preset.into(),
            fill: FillFormat::default(),
            line: LineFormat::default(),
            text: String::new(),
            font: Font::default(),
            vertical_anchor: VerticalAnchor::Top,
            horizontal_align: HorizontalAlign::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Placeholder(Placeholder),
    Table(Table),
    Chart(Box<Chart>),
    AutoShape(AutoShape),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub name: String,
    pub rect: Rect,
    pub kind: ShapeKind,
    /// Set on graphic frames created in place of a placeholder.
    pub placeholder_idx: Option<u32>,
}

impl Shape {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ShapeKind::Placeholder(_))
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match &self.kind {
            ShapeKind::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        }
    }
}

/// The shape tree of one slide, in z-order.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    shapes: Vec<Shape>,
    next_id: u32,
}

impl Default for Slide {
    fn default() -> Self {
        Self::new()
    }
}

impl Slide {
    pub fn new() -> Self {
        // id 1 belongs to the group root of the shape tree
        Self { shapes: Vec::new(), next_id: 2 }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id == id)
    }

    /// Finds a placeholder by its layout index.
    pub fn placeholder(&self, idx: u32) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.placeholder().is_some_and(|ph| ph.idx == idx))
    }

    fn push(&mut self, name: String, rect: Rect, kind: ShapeKind) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.push(Shape { id, name, rect, kind, placeholder_idx: None });
        id
    }

    pub fn add_placeholder(&mut self, kind: PlaceholderKind, idx: u32, rect: Rect) -> ShapeId {
        let name = format!("{kind:?} Placeholder {}", self.next_id - 1);
        self.push(name, rect, ShapeKind::Placeholder(Placeholder { kind, idx }))
    }

    pub fn add_table(&mut self, rows: usize, cols: usize, rect: Rect) -> ShapeId {
        let name = format!("Table {}", self.next_id - 1);
        self.push(name, rect, ShapeKind::Table(Table::new(rows, cols, rect.width, rect.height)))
    }

    pub fn add_chart(&mut self, chart: Chart, rect: Rect) -> ShapeId {
        let name = format!("Chart {}", self.next_id - 1);
        self.push(name, rect, ShapeKind::Chart(Box::new(chart)))
    }

    pub fn add_auto_shape(&mut self, shape: AutoShape, rect: Rect) -> ShapeId {
        let name = format!("{} {}", shape.preset, self.next_id - 1);
        self.push(name, rect, ShapeKind::AutoShape(shape))
    }

    /// Replaces a table-capable placeholder with a table of the same geometry.
    ///
    /// The new graphic frame takes the placeholder's position in the shape tree and
    /// the placeholder itself is gone afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeNotFound`] for an unknown id, [`Error::Unsupported`] if the
    /// shape is not a placeholder that accepts tables.
    pub fn insert_table(&mut self, placeholder: ShapeId, rows: usize, cols: usize) -> Result<ShapeId> {
        let accepts = self.placeholder_kind(placeholder)?.accepts_table();
        if !accepts {
            return Err(Error::Unsupported("placeholder does not accept a table"));
        }
        let rect = self.shape(placeholder).map(|s| s.rect).unwrap_or_default();
        self.replace_placeholder(placeholder, ShapeKind::Table(Table::new(rows, cols, rect.width, rect.height)), "Table")
    }

    /// Replaces a chart-capable placeholder with `chart`, like [`Slide::insert_table`].
    pub fn insert_chart(&mut self, placeholder: ShapeId, chart: Chart) -> Result<ShapeId> {
        if !self.placeholder_kind(placeholder)?.accepts_chart() {
            return Err(Error::Unsupported("placeholder does not accept a chart"));
        }
        self.replace_placeholder(placeholder, ShapeKind::Chart(Box::new(chart)), "Chart")
    }

    fn placeholder_kind(&self, id: ShapeId) -> Result<PlaceholderKind> {
        let shape = self.shape(id).ok_or(Error::ShapeNotFound(id))?;
        shape.placeholder().map(|ph| ph.kind).ok_or(Error::Unsupported("shape is not a placeholder"))
    }

    fn replace_placeholder(&mut self, id: ShapeId, kind: ShapeKind, label: &str) -> Result<ShapeId> {
        let new_id = ShapeId(self.next_id);
        let name = format!("{label} {}", self.next_id - 1);
        let shape = self.shape_mut(id).ok_or(Error::ShapeNotFound(id))?;
        let idx = shape.placeholder().map(|ph| ph.idx);

        *shape = Shape { id: new_id, name, rect: shape.rect, kind, placeholder_idx: idx };
        self.next_id += 1;
        debug!("Placeholder {id} replaced in place by {new_id}");
        Ok(new_id)
    }

    /// Removes a shape from the tree and returns it.
    pub fn remove_shape(&mut self, id: ShapeId) -> Result<Shape> {
        let pos = self.shapes.iter().position(|shape| shape.id == id).ok_or(Error::ShapeNotFound(id))?;
        Ok(self.shapes.remove(pos))
    }

    pub fn table_mut(&mut self, id: ShapeId) -> Result<&mut Table> {
        match &mut self.shape_mut(id).ok_or(Error::ShapeNotFound(id))?.kind {
            ShapeKind::Table(table) => Ok(table),
            _ => Err(Error::Unsupported("shape is not a table")),
        }
    }

    pub fn chart_mut(&mut self, id: ShapeId) -> Result<&mut Chart> {
        match &mut self.shape_mut(id).ok_or(Error::ShapeNotFound(id))?.kind {
            ShapeKind::Chart(chart) => Ok(&mut **chart),
            _ => Err(Error::Unsupported("shape is not a chart")),
        }
    }

    pub fn auto_shape(&self, id: ShapeId) -> Option<&AutoShape> {
        match &self.shape(id)?.kind {
            ShapeKind::AutoShape(shape) => Some(shape),
            _ => None,
        }
    }
}
