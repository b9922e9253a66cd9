//! Driving the cursor to a leaf by index path or name path

use super::{MenuDevice, MenuNavigator};
use crate::{ApiError, Result};
use tracing::{debug, info};

/// Delimiter between layer names in a textual path
pub const PATH_DELIMITER: &str = ">";

/// Target of a path selection, one element per layer starting at the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// Layer-wide line numbers, each 1-based
    Indices(Vec<u32>),
    /// Entry labels, resolved by scanning each layer's pages
    Names(Vec<String>),
}

impl PathSpec {
    /// Split a textual path on `delimiter`
    pub fn parse_names(path: &str, delimiter: &str) -> Self {
        PathSpec::Names(path.split(delimiter).map(str::to_string).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            PathSpec::Indices(indices) => indices.len(),
            PathSpec::Names(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        PathSpec::parse_names(path, PATH_DELIMITER)
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        PathSpec::from(path.as_str())
    }
}

impl From<Vec<u32>> for PathSpec {
    fn from(indices: Vec<u32>) -> Self {
        PathSpec::Indices(indices)
    }
}

impl From<&[u32]> for PathSpec {
    fn from(indices: &[u32]) -> Self {
        PathSpec::Indices(indices.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for PathSpec {
    fn from(indices: [u32; N]) -> Self {
        PathSpec::Indices(indices.to_vec())
    }
}

impl<D: MenuDevice + ?Sized> MenuNavigator<'_, D> {
    /// Select the leaf at `path`, starting from the root of the content input
    pub fn select(&self, path: impl Into<PathSpec>) -> Result<()> {
        match path.into() {
            PathSpec::Indices(indices) => self.select_by_indices(&indices),
            PathSpec::Names(names) => self.select_by_names(&names),
        }
    }

    /// Descend by layer-wide line numbers and select the last one
    ///
    /// Indices are not checked against the live tree; an out-of-range index
    /// surfaces as whatever the receiver answers.
    ///
    /// # Errors
    /// `InvalidParameter` for an empty path or a zero index, `Timeout` when
    /// a wait runs out.
    pub fn select_by_indices(&self, indices: &[u32]) -> Result<()> {
        if indices.is_empty() {
            return Err(ApiError::InvalidParameter("empty menu path".to_string()));
        }
        if indices.contains(&0) {
            return Err(ApiError::InvalidParameter(format!(
                "menu indices are 1-based: {:?}",
                indices
            )));
        }

        self.start_from_root()?;
        for &line in indices {
            debug!(line, "selecting menu line");
            self.select_line(line)?;
        }
        info!(?indices, "selected menu path");
        Ok(())
    }

    /// Descend by entry labels, scanning every page of each layer
    ///
    /// Only selectable rows match. Slower than [`select_by_indices`](Self::select_by_indices)
    /// since every page of a layer may have to be read.
    ///
    /// # Errors
    /// `PathNotFound` when a segment matches nothing on any page of its
    /// layer, `Timeout` when a wait runs out.
    pub fn select_by_names<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        if names.is_empty() {
            return Err(ApiError::InvalidParameter("empty menu path".to_string()));
        }
        let depth = names.len() as u32;

        self.start_from_root()?;
        for segment in names {
            let segment = segment.as_ref();
            let mut snapshot = self.status()?;

            let (line, layer) = loop {
                if let Some(row) = snapshot.find_row(segment) {
                    break (snapshot.global_line(row), snapshot.layer);
                }
                if !snapshot.has_next_page() {
                    return Err(ApiError::PathNotFound {
                        path: join_path(names),
                        segment: segment.to_string(),
                    });
                }
                let next = snapshot.next_page_start();
                self.jump_to_line(next)?;
                snapshot = self.wait_until(|status| status.ready && status.current_line == next)?;
            };

            debug!(segment, line, layer, "resolved menu segment");
            self.select_line(line)?;
            if layer == depth {
                break;
            }
        }

        info!(path = %join_path(names), "selected menu path");
        Ok(())
    }

    /// Switch to the content input and return to the root layer
    fn start_from_root(&self) -> Result<()> {
        self.device().set_active_input(self.content_input())?;
        self.wait_ready()?;
        self.home()?;
        self.wait_ready()?;
        Ok(())
    }
}

fn join_path<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PATH_DELIMITER)
}
