//! Net radio station selection
//!
//! Net radio pages are short and the receiver takes seconds to fetch each
//! layer, so this uses page-relative direct selection with a slow, longer
//! retry loop instead of the jump-and-poll sequence of the server selector.

use super::{MenuDevice, MenuNavigator};
use crate::{ApiError, Result};
use std::time::Duration;
use tracing::debug;

impl<D: MenuDevice + ?Sized> MenuNavigator<'_, D> {
    /// Play the net radio entry at `path`, e.g. `Bookmarks>Internet>Radio Paradise`
    ///
    /// Switches to `input`, then on each of up to `attempts` status reads:
    /// when the menu is ready, selects the row named by the path segment for
    /// the displayed layer; when busy, sleeps `interval`.
    ///
    /// # Errors
    /// `Timeout` when the last layer was not reached within `attempts`,
    /// `UnexpectedLayer` when the receiver shows a layer deeper than the path.
    pub fn select_net_radio(
        &self,
        path: &str,
        input: &str,
        attempts: u32,
        interval: Duration,
    ) -> Result<()> {
        let layers: Vec<&str> = path.split(super::selector::PATH_DELIMITER).collect();
        self.device().set_active_input(input)?;

        for attempt in 1..=attempts {
            let snapshot = self.status()?;
            if !snapshot.ready {
                debug!(attempt, "net radio menu busy");
                std::thread::sleep(interval);
                continue;
            }

            let segment = match (snapshot.layer as usize).checked_sub(1).and_then(|i| layers.get(i)) {
                Some(segment) => *segment,
                None => {
                    return Err(ApiError::UnexpectedLayer {
                        expected: path.to_string(),
                        found: snapshot.name,
                    })
                }
            };

            if let Some(row) = snapshot.find_row(segment) {
                debug!(segment, offset = row.offset, layer = snapshot.layer, "selecting net radio entry");
                self.direct_select(row.offset)?;
                if snapshot.layer as usize == layers.len() {
                    return Ok(());
                }
            }
        }

        Err(ApiError::Timeout { attempts })
    }
}
