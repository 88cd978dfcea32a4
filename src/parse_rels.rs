use crate::constants::{P_NAMESPACE, RELS_NAMESPACE, SLIDE_REL_TYPE};
use crate::Result;
use roxmltree::Document;
use std::collections::HashMap;

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Parses relationship (`.rels`) XML data.
///
/// Entries missing any of `Id`, `Type` or `Target` are skipped.
///
/// # Errors
///
/// An error is returned if the data is not valid UTF-8 or not well-formed XML.
pub fn parse_relationships(xml_data: &[u8]) -> Result<Vec<Relationship>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let mut relationships = Vec::new();
    for rel in root.children().filter(|n| n.is_element() && n.tag_name().name() == "Relationship") {
        if let (Some(id), Some(rel_type), Some(target)) = (rel.attribute("Id"), rel.attribute("Type"), rel.attribute("Target")) {
            relationships.push(Relationship {
                id: id.to_string(),
                rel_type: rel_type.to_string(),
                target: target.to_string(),
            });
        }
    }

    Ok(relationships)
}

/// Resolves the presentation's slide order into archive paths.
///
/// `presentation_xml` supplies the `<p:sldIdLst>` order, `rels_xml` maps each
/// `r:id` to a target relative to `ppt/`.
pub fn parse_slide_order(presentation_xml: &[u8], rels_xml: &[u8]) -> Result<Vec<String>> {
    let targets: HashMap<String, String> = parse_relationships(rels_xml)?
        .into_iter()
        .filter(|rel| rel.rel_type == SLIDE_REL_TYPE)
        .map(|rel| (rel.id, resolve_target(&rel.target)))
        .collect();

    let xml_str = std::str::from_utf8(presentation_xml)?;
    let doc = Document::parse(xml_str)?;

    let slide_paths = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "sldId" && n.tag_name().namespace() == Some(P_NAMESPACE))
        .filter_map(|n| n.attribute((RELS_NAMESPACE, "id")))
        .filter_map(|id| targets.get(id).cloned())
        .collect();

    Ok(slide_paths)
}

fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("ppt/{}", target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn load_xml(filename: &str) -> Vec<u8> {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests");
        path.push("test_data");
        path.push("xml");
        path.push(filename);
        fs::read(path).expect("Unable to read test data file")
    }

    #[test]
    fn test_parse_presentation_rels() {
        let rels = parse_relationships(&load_xml("presentation.xml.rels")).unwrap();
        assert_eq!(rels.len(), 4);
        assert_eq!(rels[0].id, "rId1");
        assert!(rels[0].rel_type.ends_with("/slideMaster"));
    }

    #[test]
    fn test_slide_order_follows_sld_id_lst() {
        let order = parse_slide_order(&load_xml("presentation.xml"), &load_xml("presentation.xml.rels")).unwrap();
        assert_eq!(order, vec!["ppt/slides/slide2.xml", "ppt/slides/slide1.xml", "ppt/slides/slide10.xml"]);
    }

    #[test]
    fn test_empty_relationships() {
        let xml = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;
        assert!(parse_relationships(xml).unwrap().is_empty());
    }
}
