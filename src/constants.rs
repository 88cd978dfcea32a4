pub const A_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const C_NAMESPACE: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
pub const P_NAMESPACE: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const RELS_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";
pub const SLIDE_REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// English Metric Units per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;
/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Scale of OOXML percentage attributes (`lumMod`, `lumOff`, `alpha`): 100000 = 100%.
pub const OOXML_PERCENT: f64 = 100_000.0;
/// Scale of OOXML angle attributes: 60000 = 1 degree.
pub const OOXML_DEGREE: f64 = 60_000.0;

pub const STYLE_FILE_NAME: &str = "style.yaml";
pub const PROJECT_STYLE_DIR: [&str; 2] = ["powerpoint", "processing"];
pub const LEGACY_STYLE_DIR: [&str; 1] = ["processing"];
pub const MASTER_TEMPLATES_DIR: [&str; 2] = [".pptx-style", "templates"];
