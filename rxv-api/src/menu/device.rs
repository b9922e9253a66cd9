//! What the menu subsystem needs from a receiver
//!
//! [`MenuDevice`] is the collaborator interface the navigation code drives.
//! [`Receiver`](crate::Receiver) implements it over HTTP; tests implement it
//! with a scripted device that tracks its own cursor.

use super::cursor::Cursor;
use crate::{ApiError, Result};
use ync_client::Command;
use xmltree::Element;

/// One menu request addressed to a content source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRequest {
    /// Read the current layer, page and cursor position
    ListInfo,
    /// Move the remote cursor one step, or select/return/home
    Cursor(Cursor),
    /// Jump the remote cursor to a layer-wide line number
    JumpLine(u32),
    /// Select a page-relative line directly
    DirectSelect(u32),
}

impl MenuRequest {
    pub fn command(&self) -> Command {
        match self {
            MenuRequest::ListInfo => Command::Get,
            _ => Command::Put,
        }
    }

    /// Payload fragment for the given source, e.g. `<SERVER><List_Info>GetParam</List_Info></SERVER>`
    pub fn payload(&self, source: &str) -> String {
        let body = match self {
            MenuRequest::ListInfo => "<List_Info>GetParam</List_Info>".to_string(),
            MenuRequest::Cursor(cursor) => format!(
                "<List_Control><Cursor>{}</Cursor></List_Control>",
                cursor.as_str()
            ),
            MenuRequest::JumpLine(line) => {
                format!("<List_Control><Jump_Line>{}</Jump_Line></List_Control>", line)
            }
            MenuRequest::DirectSelect(line) => {
                format!("<List_Control><Direct_Sel>Line_{}</Direct_Sel></List_Control>", line)
            }
        };
        format!("<{source}>{body}</{source}>")
    }

    /// Short description used in errors and logs
    pub fn describe(&self) -> String {
        match self {
            MenuRequest::ListInfo => "List_Info".to_string(),
            MenuRequest::Cursor(cursor) => format!("Cursor {}", cursor.as_str()),
            MenuRequest::JumpLine(line) => format!("Jump_Line {}", line),
            MenuRequest::DirectSelect(line) => format!("Direct_Sel Line_{}", line),
        }
    }
}

/// A receiver whose on-screen menu can be driven remotely
pub trait MenuDevice {
    /// Name of the currently selected input
    fn current_input(&self) -> Result<String>;

    /// Content-source name of an input, `None` for inputs without a menu
    fn source_name_for(&self, input: &str) -> Result<Option<String>>;

    /// Switch the active input
    fn set_active_input(&self, input: &str) -> Result<()>;

    /// Send one menu request to `source` and return the parsed reply
    fn send_menu_request(&self, source: &str, request: &MenuRequest) -> Result<Element>;

    /// Content source of the active input
    ///
    /// Fails with `MenuUnavailable` naming the input and `action` when the
    /// input cannot be browsed. No menu request is sent in that case.
    fn menu_source(&self, action: &str) -> Result<String> {
        let input = self.current_input()?;
        match self.source_name_for(&input)? {
            Some(source) => Ok(source),
            None => Err(ApiError::menu_unavailable(input, action)),
        }
    }
}
