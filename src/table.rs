use crate::format::{ColorFormat, FillFormat, Font, HorizontalAlign, LineFormat, VerticalAnchor};
use quick_xml::escape::escape;

/// One side of a cell border.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Border {
    pub width_emu: i64,
    pub color: ColorFormat,
}

impl Border {
    fn to_xml(&self, tag: &str) -> String {
        let mut line = LineFormat { width_emu: Some(self.width_emu), ..LineFormat::default() };
        if self.color.value().is_some() {
            *line.color_mut() = self.color.clone();
        }
        line.to_xml(tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellBorders {
    pub left: Option<Border>,
    pub right: Option<Border>,
    pub top: Option<Border>,
    pub bottom: Option<Border>,
}

impl CellBorders {
    /// Sides in DrawingML order, paired with their `tcPr` child tag.
    fn sides(&self) -> [(&'static str, Option<&Border>); 4] {
        [
            ("lnL", self.left.as_ref()),
            ("lnR", self.right.as_ref()),
            ("lnT", self.top.as_ref()),
            ("lnB", self.bottom.as_ref()),
        ]
    }

    pub fn is_complete(&self) -> bool {
        self.sides().iter().all(|(_, side)| side.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub fill: FillFormat,
    pub font: Font,
    pub margin_left_emu: i64,
    pub margin_right_emu: i64,
    pub margin_top_emu: i64,
    pub margin_bottom_emu: i64,
    pub vertical_anchor: VerticalAnchor,
    pub horizontal_align: HorizontalAlign,
    pub borders: CellBorders,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            text: String::new(),
            fill: FillFormat::default(),
            font: Font::default(),
            margin_left_emu: 91_440,
            margin_right_emu: 91_440,
            margin_top_emu: 45_720,
            margin_bottom_emu: 45_720,
            vertical_anchor: VerticalAnchor::Top,
            horizontal_align: HorizontalAlign::Left,
            borders: CellBorders::default(),
        }
    }
}

impl Cell {
    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>");
        xml.push_str(&format!("<a:pPr algn=\"{}\"/>", self.horizontal_align.as_ooxml()));
        if self.text.is_empty() {
            xml.push_str("<a:endParaRPr lang=\"ja-JP\"/>");
        } else {
            xml.push_str("<a:r>");
            xml.push_str(&self.font.to_xml());
            xml.push_str(&format!("<a:t>{}</a:t></a:r>", escape(self.text.as_str())));
        }
        xml.push_str("</a:p></a:txBody>");

        xml.push_str(&format!(
            "<a:tcPr marL=\"{}\" marR=\"{}\" marT=\"{}\" marB=\"{}\" anchor=\"{}\">",
            self.margin_left_emu,
            self.margin_right_emu,
            self.margin_top_emu,
            self.margin_bottom_emu,
            self.vertical_anchor.as_ooxml()
        ));
        for (tag, side) in self.borders.sides() {
            if let Some(border) = side {
                xml.push_str(&border.to_xml(tag));
            }
        }
        xml.push_str(&self.fill.to_xml());
        xml.push_str("</a:tcPr></a:tc>");
        xml
    }
}

/// A grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    pub column_widths: Vec<i64>,
    pub row_heights: Vec<i64>,
    /// Marks row 0 as a header row (`<a:tblPr firstRow="1">`).
    pub first_row: bool,
}

impl Table {
    /// Creates an empty table, splitting `width`/`height` (EMU) evenly.
    pub fn new(rows: usize, cols: usize, width: i64, height: i64) -> Self {
        let column_width = if cols > 0 { width / cols as i64 } else { 0 };
        let row_height = if rows > 0 { height / rows as i64 } else { 0 };
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
            column_widths: vec![column_width; cols],
            row_heights: vec![row_height; rows],
            first_row: true,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// All cells with their `(row, col)` position.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut Cell)> {
        let cols = self.cols.max(1);
        self.cells.iter_mut().enumerate().map(move |(idx, cell)| ((idx / cols, idx % cols), cell))
    }

    /// Serializes the table as a DrawingML `<a:tbl>` element.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024 * self.rows.max(1));
        xml.push_str(&format!("<a:tbl><a:tblPr firstRow=\"{}\" bandRow=\"1\"/>", u8::from(self.first_row)));

        xml.push_str("<a:tblGrid>");
        for width in &self.column_widths {
            xml.push_str(&format!("<a:gridCol w=\"{width}\"/>"));
        }
        xml.push_str("</a:tblGrid>");

        for (row, height) in self.row_heights.iter().enumerate() {
            xml.push_str(&format!("<a:tr h=\"{height}\">"));
            for col in 0..self.cols {
                if let Some(cell) = self.cell(row, col) {
                    xml.push_str(&cell.to_xml());
                }
            }
            xml.push_str("</a:tr>");
        }

        xml.push_str("</a:tbl>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ThemeColor;

    #[test]
    fn test_cell_addressing() {
        let mut table = Table::new(2, 3, 3_000, 1_000);
        assert_eq!(table.column_widths, vec![1_000; 3]);
        assert_eq!(table.row_heights, vec![500; 2]);

        table.cell_mut(1, 2).unwrap().text = "x".to_string();
        assert_eq!(table.cell(1, 2).unwrap().text, "x");
        assert!(table.cell(2, 0).is_none());
        assert!(table.cell_mut(0, 3).is_none());

        let positions: Vec<(usize, usize)> = table.cells_mut().map(|(pos, _)| pos).collect();
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[4], (1, 1));
    }

    #[test]
    fn test_border_xml_is_theme_based() {
        let mut color = ColorFormat::default();
        color.set_theme_color(ThemeColor::Accent1);
        color.set_brightness(-0.25).unwrap();

        let mut table = Table::new(1, 1, 100, 100);
        let cell = table.cell_mut(0, 0).unwrap();
        cell.text = "a & b".to_string();
        cell.borders.left = Some(Border { width_emu: 19_050, color });

        let xml = table.to_xml();
        assert!(xml.contains(
            r#"<a:lnL w="19050"><a:solidFill><a:schemeClr val="accent1"><a:lumMod val="75000"/></a:schemeClr></a:solidFill></a:lnL>"#
        ));
        assert!(xml.contains("<a:t>a &amp; b</a:t>"));
        assert!(roxmltree::Document::parse(&format!(
            r#"<root xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">{xml}</root>"#
        ))
        .is_ok());
    }
}
