//! Remote menu navigation for browsable content sources
//!
//! Inputs such as `SERVER` or `NET RADIO` expose a paginated, hierarchical
//! on-screen menu whose cursor lives on the receiver. This module reads that
//! menu ([`status`]), moves its cursor ([`cursor`]), waits for it to settle
//! ([`poll`]), walks the whole tree ([`walker`]) and drives the cursor to a
//! specific entry ([`selector`]).
//!
//! Nothing about the remote cursor is cached: every step re-reads the status,
//! and the walker returns to the root before descending into each container.
//! Callers must serialise access to a receiver themselves; another client
//! moving the cursor mid-walk shows up as a `Timeout` or `UnexpectedLayer`.
//!
//! ```rust,ignore
//! use rxv_api::{Receiver, ReceiverConfig};
//!
//! let receiver = Receiver::new(ReceiverConfig::new("http://10.0.0.2/YamahaRemoteControl/ctrl"))?;
//! for path in receiver.server_paths()? {
//!     println!("{} ({})", path.names, path.indices);
//! }
//! receiver.server_select("Fancy Server>Radio>Stream 17")?;
//! receiver.server_select(vec![1, 2, 17])?;
//! ```

pub mod cursor;
pub mod device;
pub mod net_radio;
pub mod poll;
pub mod selector;
pub mod status;
pub mod walker;

pub use cursor::Cursor;
pub use device::{MenuDevice, MenuRequest};
pub use poll::Poller;
pub use selector::PathSpec;
pub use status::{MenuEntry, MenuRow, MenuSnapshot};
pub use walker::{flatten_paths, MenuNode, PageScan, ServerPath};

use crate::config::PollConfig;
use crate::Result;

/// Drives the menu of one receiver
///
/// Every operation resolves the active content source first and fails with
/// `MenuUnavailable` when the active input has none.
#[derive(Debug)]
pub struct MenuNavigator<'a, D: MenuDevice + ?Sized> {
    device: &'a D,
    poller: Poller,
    content_input: String,
}

impl<'a, D: MenuDevice + ?Sized> MenuNavigator<'a, D> {
    pub fn new(device: &'a D, poll: PollConfig) -> Self {
        Self {
            device,
            poller: Poller::new(poll),
            content_input: "SERVER".to_string(),
        }
    }

    /// Input selected before path selection starts
    pub fn with_content_input(mut self, input: impl Into<String>) -> Self {
        self.content_input = input.into();
        self
    }

    pub fn device(&self) -> &'a D {
        self.device
    }

    pub fn content_input(&self) -> &str {
        &self.content_input
    }

    /// Read the current menu status
    pub fn status(&self) -> Result<MenuSnapshot> {
        let source = self.device.menu_source(&MenuRequest::ListInfo.describe())?;
        status::read_status(self.device, &source)
    }

    /// Jump the cursor to a layer-wide line number
    pub fn jump_to_line(&self, line: u32) -> Result<()> {
        let source = self.device.menu_source(&MenuRequest::JumpLine(line).describe())?;
        cursor::jump_to_line(self.device, &source, line)
    }

    /// Issue a single cursor action
    pub fn move_cursor(&self, action: Cursor) -> Result<()> {
        let source = self.device.menu_source(&MenuRequest::Cursor(action).describe())?;
        cursor::move_cursor(self.device, &source, action)
    }

    /// Select a page-relative line directly
    pub fn direct_select(&self, line: u32) -> Result<()> {
        let source = self.device.menu_source(&MenuRequest::DirectSelect(line).describe())?;
        cursor::direct_select(self.device, &source, line)
    }

    pub fn up(&self) -> Result<()> {
        self.move_cursor(Cursor::Up)
    }

    pub fn down(&self) -> Result<()> {
        self.move_cursor(Cursor::Down)
    }

    pub fn left(&self) -> Result<()> {
        self.move_cursor(Cursor::Left)
    }

    pub fn right(&self) -> Result<()> {
        self.move_cursor(Cursor::Right)
    }

    pub fn sel(&self) -> Result<()> {
        self.move_cursor(Cursor::Select)
    }

    pub fn back(&self) -> Result<()> {
        self.move_cursor(Cursor::Return)
    }

    pub fn home(&self) -> Result<()> {
        self.move_cursor(Cursor::Home)
    }

    /// Re-read the status until `predicate` holds and return that snapshot
    ///
    /// # Errors
    /// `Timeout` once the poller's retries are exhausted.
    pub fn wait_until<P>(&self, predicate: P) -> Result<MenuSnapshot>
    where
        P: Fn(&MenuSnapshot) -> bool,
    {
        self.poller.poll(|| {
            let snapshot = self.status()?;
            Ok(predicate(&snapshot).then_some(snapshot))
        })
    }

    /// Wait until the menu reports `Ready`
    pub fn wait_ready(&self) -> Result<MenuSnapshot> {
        self.wait_until(|status| status.ready)
    }

    /// Jump to `line` in the current layer, then select it
    pub(crate) fn select_line(&self, line: u32) -> Result<()> {
        self.jump_to_line(line)?;
        self.wait_until(|status| status.ready && status.current_line == line)?;
        self.sel()?;
        self.wait_ready()?;
        Ok(())
    }

    /// Return to the root layer and wait until it is displayed
    pub(crate) fn go_home(&self) -> Result<()> {
        self.wait_ready()?;
        self.home()?;
        self.wait_until(|status| status.ready && status.layer == 1)?;
        Ok(())
    }
}
