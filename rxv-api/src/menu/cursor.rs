//! Single-step cursor and line-jump commands
//!
//! These are the only requests that change the remote menu. Each returns as
//! soon as the receiver acknowledges it; whether the menu actually moved is
//! only visible through a later status read.

use super::device::{MenuDevice, MenuRequest};
use crate::Result;
use tracing::debug;

/// Cursor actions accepted by `List_Control/Cursor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    Up,
    Down,
    Left,
    Right,
    Select,
    Return,
    Home,
}

impl Cursor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cursor::Up => "Up",
            Cursor::Down => "Down",
            Cursor::Left => "Left",
            Cursor::Right => "Right",
            Cursor::Select => "Sel",
            Cursor::Return => "Return",
            Cursor::Home => "Return to Home",
        }
    }
}

/// Jump the cursor of `source` to a layer-wide line number
pub fn jump_to_line<D: MenuDevice + ?Sized>(device: &D, source: &str, line: u32) -> Result<()> {
    debug!(source, line, "menu jump");
    device.send_menu_request(source, &MenuRequest::JumpLine(line))?;
    Ok(())
}

/// Issue one cursor action on `source`
pub fn move_cursor<D: MenuDevice + ?Sized>(device: &D, source: &str, cursor: Cursor) -> Result<()> {
    debug!(source, cursor = cursor.as_str(), "menu cursor");
    device.send_menu_request(source, &MenuRequest::Cursor(cursor))?;
    Ok(())
}

/// Select a page-relative line directly
pub fn direct_select<D: MenuDevice + ?Sized>(device: &D, source: &str, line: u32) -> Result<()> {
    debug!(source, line, "menu direct select");
    device.send_menu_request(source, &MenuRequest::DirectSelect(line))?;
    Ok(())
}
