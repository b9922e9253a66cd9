//! Lookup helpers over parsed `xmltree` documents.
//!
//! Receiver replies nest the interesting value a few levels below the
//! `YAMAHA_AV` root (`Main_Zone/Volume/Lvl/Val`), and the descriptor is
//! searched by attribute anywhere in the tree. These helpers cover both.

use crate::{ApiError, Result};
use xmltree::{Element, XMLNode};

/// Iterate over the element children of `element`
pub fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

/// Collect `element` and all its descendants in document order
pub fn descendants(element: &Element) -> Vec<&Element> {
    fn collect<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
        out.push(element);
        for child in child_elements(element) {
            collect(child, out);
        }
    }

    let mut out = Vec::new();
    collect(element, &mut out);
    out
}

/// First element named `name` in document order, `element` itself included
pub fn find_descendant<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    if element.name == name {
        return Some(element);
    }
    child_elements(element).find_map(|child| find_descendant(child, name))
}

/// Follow a `/`-separated path of child names below `element`
pub fn find_path<'a>(element: &'a Element, path: &str) -> Option<&'a Element> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(element, |current, segment| current.get_child(segment))
}

/// Text content of an element, empty when it has none
pub fn element_text(element: &Element) -> String {
    element
        .get_text()
        .map(|text| text.into_owned())
        .unwrap_or_default()
}

/// Text at `path`, or `MissingElement` naming the path
pub fn text_at(element: &Element, path: &str) -> Result<String> {
    find_path(element, path)
        .map(element_text)
        .ok_or_else(|| ApiError::MissingElement(path.to_string()))
}

/// Text of the first descendant named `name`, or `MissingElement`
pub fn descendant_text(element: &Element, name: &str) -> Result<String> {
    find_descendant(element, name)
        .map(element_text)
        .ok_or_else(|| ApiError::MissingElement(name.to_string()))
}

/// Parse the text of the first descendant named `name` as an integer
pub fn descendant_number<T: std::str::FromStr>(element: &Element, name: &str) -> Result<T> {
    let text = descendant_text(element, name)?;
    text.trim()
        .parse()
        .map_err(|_| ApiError::ParseError(format!("{} is not a number: '{}'", name, text)))
}

/// Decode entities that survived XML parsing
///
/// Tuner and net radio sources sometimes double-escape their metadata.
pub fn unescape_text(text: &str) -> String {
    match quick_xml::escape::unescape(text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_string(),
    }
}
