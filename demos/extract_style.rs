//! Extracts the style document from a chart template and a reference deck.
//!
//! Run with: cargo run --example extract_style <template.crtx> <template.pptx> [output.yaml]

use pptx_style::{extract_and_save, ExtractConfig, Result};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: cargo run --example extract_style <template.crtx> <template.pptx> [output.yaml]");
        return Ok(());
    }
    let output = args.get(3).map(String::as_str).unwrap_or("powerpoint/processing/style.yaml");

    // Table exemplar on slide 1, flowchart exemplar on slide 2
    let config = ExtractConfig::builder().table_slide(1).flowchart_slide(2).build();

    let document = extract_and_save(Path::new(&args[1]), Path::new(&args[2]), Path::new(output), &config)?;

    println!("Style document written to {output}");
    println!("  primary color:  {}", document.colors.primary);
    println!("  series colors:  {}", document.colors.series.len());
    println!("  legend:         {}", document.legend.position);
    println!("  table header:   {} {}pt", document.table.header.font_family, document.table.header.font_size_pt);
    println!("  flowchart node: {}", document.flowchart.node.shape);

    Ok(())
}
