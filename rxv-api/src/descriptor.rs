//! Capability lookups over the unit descriptor (`desc.xml`).
//!
//! The descriptor lists every command the receiver understands as
//! comma-separated `Cmd_List/Define` entries and groups per-source features
//! under elements tagged with `YNC_Tag` and `Func` attributes.

use crate::xml::{child_elements, descendants, element_text};
use xmltree::Element;

/// Parsed unit descriptor
#[derive(Debug, Clone)]
pub struct Descriptor {
    root: Element,
}

impl Descriptor {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// All command definitions starting with `prefix`, e.g. `System,Sound_Video,HDMI,Output`
    pub fn find_commands(&self, prefix: &str) -> Vec<String> {
        self.command_definitions()
            .into_iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .collect()
    }

    /// Whether a command `source,args...` is declared
    pub fn supports_method(&self, source: &str, args: &[&str]) -> bool {
        self.command_definitions().iter().any(|cmd| {
            let mut parts = cmd.split(',');
            parts.next() == Some(source) && parts.eq(args.iter().copied())
        })
    }

    /// Whether the source's `Play_Control` block lists `method` as a `Put_1` value
    pub fn supports_play_method(&self, source: &str, method: &str) -> bool {
        let Some(source_xml) = find_by_attr(&self.root, "YNC_Tag", source) else {
            return false;
        };
        let Some(play_control) = find_by_attr(source_xml, "Func", "Play_Control") else {
            return false;
        };

        descendants(play_control)
            .into_iter()
            .filter(|e| e.name == "Put_1")
            .any(|e| element_text(e) == method)
    }

    /// Zone tags of every `Func="Subunit"` element
    pub fn zones(&self) -> Vec<String> {
        descendants(&self.root)
            .into_iter()
            .skip(1)
            .filter(|e| e.attributes.get("Func").map(String::as_str) == Some("Subunit"))
            .filter_map(|e| e.attributes.get("YNC_Tag").cloned())
            .collect()
    }

    /// Surround programs listed in the zone's setup block
    ///
    /// `None` when the descriptor has no such block.
    pub fn surround_programs(&self, zone: &str) -> Option<Vec<String>> {
        let zone_xml = find_by_attr(&self.root, "YNC_Tag", zone)?;
        let setup = find_by_attr(zone_xml, "Title_1", "Setup")?;
        let params = descendants(setup)
            .into_iter()
            .filter(|e| e.name == "Put_2")
            .find_map(|put| put.get_child("Param_1"))?;

        Some(
            descendants(params)
                .into_iter()
                .filter(|e| e.name == "Direct")
                .map(element_text)
                .collect(),
        )
    }

    fn command_definitions(&self) -> Vec<String> {
        descendants(&self.root)
            .into_iter()
            .filter(|e| e.name == "Cmd_List")
            .flat_map(|e| child_elements(e))
            .map(element_text)
            .collect()
    }
}

/// First strict descendant of `element` whose `attr` equals `value`
fn find_by_attr<'a>(element: &'a Element, attr: &str, value: &str) -> Option<&'a Element> {
    descendants(element)
        .into_iter()
        .skip(1)
        .find(|e| e.attributes.get(attr).map(String::as_str) == Some(value))
}
