//! Menu status snapshots
//!
//! A `List_Info` reply describes one page of the current layer:
//!
//! ```text
//! <SERVER><List_Info>
//!   <Menu_Status>Ready</Menu_Status>
//!   <Menu_Layer>2</Menu_Layer>
//!   <Menu_Name>Fancy Server</Menu_Name>
//!   <Current_List>
//!     <Line_1><Txt>Music</Txt><Attribute>Container</Attribute></Line_1>
//!     ...
//!   </Current_List>
//!   <Cursor_Position><Current_Line>1</Current_Line><Max_Line>9</Max_Line></Cursor_Position>
//! </List_Info></SERVER>
//! ```
//!
//! Row tags are page-relative; `Current_Line` is the layer-wide number of the
//! first row on the page.

use super::device::{MenuDevice, MenuRequest};
use crate::xml::{child_elements, descendant_number, descendant_text, element_text, find_descendant};
use crate::{ApiError, Result};
use serde::Serialize;
use tracing::{debug, warn};
use xmltree::Element;

/// Classification of one menu row, keyed by its `Attribute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MenuEntry {
    /// Opens a deeper layer when selected
    Container(String),
    /// Playable content
    Item(String),
    /// Shown and selectable but not playable
    UnplayableItem(String),
    /// Padding or decoration; never selected
    Unselectable(String),
}

impl MenuEntry {
    /// Classify a row from its wire attribute
    ///
    /// Unknown attributes are treated as unselectable so they still count
    /// toward page length.
    pub fn classify(attribute: &str, text: String) -> Self {
        match attribute {
            "Container" => MenuEntry::Container(text),
            "Item" => MenuEntry::Item(text),
            "Unplayable Item" => MenuEntry::UnplayableItem(text),
            "Unselectable" => MenuEntry::Unselectable(text),
            other => {
                warn!(attribute = other, "unknown menu row attribute");
                MenuEntry::Unselectable(text)
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            MenuEntry::Container(text)
            | MenuEntry::Item(text)
            | MenuEntry::UnplayableItem(text)
            | MenuEntry::Unselectable(text) => text,
        }
    }

    pub fn is_selectable(&self) -> bool {
        !matches!(self, MenuEntry::Unselectable(_))
    }
}

/// One visible row of the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuRow {
    /// Row tag as sent by the receiver, e.g. `Line_3`
    pub display_line: String,
    /// 1-based position of the row within its page
    pub offset: u32,
    pub entry: MenuEntry,
}

impl MenuRow {
    pub fn new(display_line: impl Into<String>, entry: MenuEntry) -> Result<Self> {
        let display_line = display_line.into();
        let offset = parse_display_line(&display_line).ok_or_else(|| {
            ApiError::ParseError(format!("Unrecognised menu line label '{}'", display_line))
        })?;

        Ok(Self {
            display_line,
            offset,
            entry,
        })
    }
}

/// Page-relative index of a row label
///
/// Accepts `Line_N` as well as a bare number.
pub fn parse_display_line(label: &str) -> Option<u32> {
    let digits = label.strip_prefix("Line_").unwrap_or(label);
    digits.parse().ok().filter(|offset| *offset >= 1)
}

/// Result of one status read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSnapshot {
    /// False while the receiver is still rendering the page
    pub ready: bool,
    /// Depth in the hierarchy, 1 at the root
    pub layer: u32,
    /// Label of the displayed layer
    pub name: String,
    /// Layer-wide number of the first row on this page
    pub current_line: u32,
    /// Number of rows in the whole layer
    pub max_line: u32,
    /// Rows of this page in reply order
    pub rows: Vec<MenuRow>,
}

impl MenuSnapshot {
    /// Parse a `List_Info` reply
    pub fn from_xml(xml: &Element) -> Result<Self> {
        let ready = descendant_text(xml, "Menu_Status")? == "Ready";
        let layer = descendant_number(xml, "Menu_Layer")?;
        let name = descendant_text(xml, "Menu_Name")?;
        let current_line = descendant_number(xml, "Current_Line")?;
        let max_line = descendant_number(xml, "Max_Line")?;
        let current_list = find_descendant(xml, "Current_List")
            .ok_or_else(|| ApiError::MissingElement("Current_List".to_string()))?;

        let rows = child_elements(current_list)
            .map(|row| {
                let attribute = row.get_child("Attribute").map(element_text).unwrap_or_default();
                let text = row.get_child("Txt").map(element_text).unwrap_or_default();
                MenuRow::new(row.name.clone(), MenuEntry::classify(&attribute, text))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ready,
            layer,
            name,
            current_line,
            max_line,
            rows,
        })
    }

    /// Layer-wide line number of a row on this page
    pub fn global_line(&self, row: &MenuRow) -> u32 {
        self.current_line.saturating_add(row.offset.saturating_sub(1))
    }

    /// First line of the page after this one
    ///
    /// Counts every row, unselectable padding included. Saturates at
    /// `u32::MAX`, which then reads as "no next page".
    pub fn next_page_start(&self) -> u32 {
        let last_offset = self.rows.iter().map(|row| row.offset).max().unwrap_or(0);
        self.current_line.saturating_add(last_offset)
    }

    /// Whether another page follows this one
    ///
    /// An empty page never advances, so a misreported `Max_Line` cannot make
    /// pagination spin on the same line.
    pub fn has_next_page(&self) -> bool {
        let next = self.next_page_start();
        next > self.current_line && next <= self.max_line
    }

    /// First selectable row whose text equals `text`
    pub fn find_row(&self, text: &str) -> Option<&MenuRow> {
        self.rows
            .iter()
            .find(|row| row.entry.is_selectable() && row.entry.text() == text)
    }

    pub fn containers(&self) -> impl Iterator<Item = &MenuRow> {
        self.rows.iter().filter(|row| matches!(row.entry, MenuEntry::Container(_)))
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuRow> {
        self.rows.iter().filter(|row| matches!(row.entry, MenuEntry::Item(_)))
    }

    pub fn unplayables(&self) -> impl Iterator<Item = &MenuRow> {
        self.rows.iter().filter(|row| matches!(row.entry, MenuEntry::UnplayableItem(_)))
    }

    pub fn unselectables(&self) -> impl Iterator<Item = &MenuRow> {
        self.rows.iter().filter(|row| matches!(row.entry, MenuEntry::Unselectable(_)))
    }
}

/// Read the menu status of `source`
pub fn read_status<D: MenuDevice + ?Sized>(device: &D, source: &str) -> Result<MenuSnapshot> {
    let xml = device.send_menu_request(source, &MenuRequest::ListInfo)?;
    let snapshot = MenuSnapshot::from_xml(&xml)?;
    debug!(
        source,
        ready = snapshot.ready,
        layer = snapshot.layer,
        name = %snapshot.name,
        current_line = snapshot.current_line,
        max_line = snapshot.max_line,
        "menu status"
    );
    Ok(snapshot)
}
