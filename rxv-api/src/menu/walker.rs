//! Full menu tree enumeration
//!
//! The walk is split in two: [`PageScan`] turns one snapshot into nodes and a
//! next-page line without touching the device, and [`MenuNavigator::walk`]
//! moves the remote cursor between pages and layers.
//!
//! Walking is slow: it costs a few round trips per page per layer, and every
//! container is entered by navigating from the root again.

use super::status::{MenuRow, MenuSnapshot};
use super::{MenuDevice, MenuNavigator};
use crate::{ApiError, Result};
use serde::Serialize;
use tracing::debug;

/// One entry of a materialised menu tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MenuNode {
    Leaf {
        line: u32,
        label: String,
    },
    Container {
        line: u32,
        label: String,
        children: Vec<MenuNode>,
    },
}

impl MenuNode {
    /// Layer-wide line number of this entry within its parent
    pub fn line(&self) -> u32 {
        match self {
            MenuNode::Leaf { line, .. } | MenuNode::Container { line, .. } => *line,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MenuNode::Leaf { label, .. } | MenuNode::Container { label, .. } => label,
        }
    }

    /// Children of a container, empty for leaves
    pub fn children(&self) -> &[MenuNode] {
        match self {
            MenuNode::Leaf { .. } => &[],
            MenuNode::Container { children, .. } => children,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, MenuNode::Container { .. })
    }
}

/// Entries of one page, grouped the way the receiver reports them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    pub containers: Vec<(u32, String)>,
    pub items: Vec<(u32, String)>,
    pub unplayables: Vec<(u32, String)>,
    pub next_page_start: u32,
    pub has_next_page: bool,
}

impl PageScan {
    /// Classify the rows of `snapshot` by layer-wide line number
    ///
    /// Unselectable rows are dropped but still extend the page, so they push
    /// `next_page_start` forward.
    pub fn of(snapshot: &MenuSnapshot) -> Self {
        PageScan {
            containers: numbered(snapshot, snapshot.containers()),
            items: numbered(snapshot, snapshot.items()),
            unplayables: numbered(snapshot, snapshot.unplayables()),
            next_page_start: snapshot.next_page_start(),
            has_next_page: snapshot.has_next_page(),
        }
    }
}

fn numbered<'a>(snapshot: &MenuSnapshot, rows: impl Iterator<Item = &'a MenuRow>) -> Vec<(u32, String)> {
    rows.map(|row| (snapshot.global_line(row), row.entry.text().to_string()))
        .collect()
}

/// A selectable leaf with its full name path and index path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerPath {
    /// Labels joined by `>`, e.g. `Fancy Server>Radio>Stream 1`
    pub names: String,
    /// Line numbers joined by `>`, e.g. `1>2>1`
    pub indices: String,
}

/// Flatten a walked tree into one [`ServerPath`] per leaf, depth first
pub fn flatten_paths(nodes: &[MenuNode]) -> Vec<ServerPath> {
    fn visit(nodes: &[MenuNode], names: &mut Vec<String>, indices: &mut Vec<String>, out: &mut Vec<ServerPath>) {
        for node in nodes {
            names.push(node.label().to_string());
            indices.push(node.line().to_string());
            match node {
                MenuNode::Leaf { .. } => out.push(ServerPath {
                    names: names.join(">"),
                    indices: indices.join(">"),
                }),
                MenuNode::Container { children, .. } => visit(children, names, indices, out),
            }
            names.pop();
            indices.pop();
        }
    }

    let mut out = Vec::new();
    visit(nodes, &mut Vec::new(), &mut Vec::new(), &mut out);
    out
}

impl<D: MenuDevice + ?Sized> MenuNavigator<'_, D> {
    /// Enumerate every entry below the layer reached through `prefix`
    ///
    /// `prefix` lists `(line, label)` pairs from the root; pass `&[]` for the
    /// whole tree. Within a layer, containers come first (each with its
    /// walked children), then items, then unplayable items, each group in
    /// page-then-line order.
    ///
    /// # Errors
    /// `Timeout` when the receiver does not settle, `UnexpectedLayer` when
    /// the displayed layer is not the one `prefix` leads to, or any
    /// transport error.
    pub fn walk(&self, prefix: &[(u32, String)]) -> Result<Vec<MenuNode>> {
        self.browse_to(prefix)?;

        let mut containers = Vec::new();
        let mut items = Vec::new();
        let mut unplayables = Vec::new();

        loop {
            let snapshot = self.status()?;
            if let Some((_, expected)) = prefix.last() {
                if snapshot.name != *expected {
                    return Err(ApiError::UnexpectedLayer {
                        expected: expected.clone(),
                        found: snapshot.name,
                    });
                }
            }

            let scan = PageScan::of(&snapshot);
            debug!(
                layer = %snapshot.name,
                current_line = snapshot.current_line,
                containers = scan.containers.len(),
                items = scan.items.len(),
                unplayables = scan.unplayables.len(),
                "scanned menu page"
            );

            for (line, label) in scan.containers {
                let mut child_prefix = prefix.to_vec();
                child_prefix.push((line, label.clone()));
                let children = self.walk(&child_prefix)?;
                containers.push(MenuNode::Container { line, label, children });
            }
            items.extend(scan.items.into_iter().map(|(line, label)| MenuNode::Leaf { line, label }));
            unplayables.extend(
                scan.unplayables
                    .into_iter()
                    .map(|(line, label)| MenuNode::Leaf { line, label }),
            );

            if !scan.has_next_page {
                break;
            }

            // a walk into a container leaves the cursor in that container
            if self.status()?.name != snapshot.name {
                self.browse_to(prefix)?;
            }

            let next = scan.next_page_start;
            self.jump_to_line(next)?;
            self.wait_until(|status| status.ready && status.current_line == next)?;
        }

        containers.extend(items);
        containers.extend(unplayables);
        Ok(containers)
    }

    /// Navigate from the root into the layer reached through `prefix`
    fn browse_to(&self, prefix: &[(u32, String)]) -> Result<()> {
        self.go_home()?;
        for (line, _) in prefix {
            self.select_line(*line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::status::MenuEntry;

    fn row(line: u32, entry: MenuEntry) -> MenuRow {
        MenuRow::new(format!("Line_{}", line), entry).unwrap()
    }

    fn snapshot(current_line: u32, max_line: u32, rows: Vec<MenuRow>) -> MenuSnapshot {
        MenuSnapshot {
            ready: true,
            layer: 2,
            name: "Fancy Server".to_string(),
            current_line,
            max_line,
            rows,
        }
    }

    #[test]
    fn test_scan_groups_by_kind() {
        let page = snapshot(
            1,
            9,
            vec![
                row(1, MenuEntry::Item("Song A".to_string())),
                row(2, MenuEntry::Container("Music".to_string())),
                row(3, MenuEntry::UnplayableItem("Info".to_string())),
                row(4, MenuEntry::Container("Radio".to_string())),
                row(5, MenuEntry::Item("Song B".to_string())),
                row(6, MenuEntry::Unselectable(String::new())),
            ],
        );

        let scan = PageScan::of(&page);
        assert_eq!(scan.containers, vec![(2, "Music".to_string()), (4, "Radio".to_string())]);
        assert_eq!(scan.items, vec![(1, "Song A".to_string()), (5, "Song B".to_string())]);
        assert_eq!(scan.unplayables, vec![(3, "Info".to_string())]);
        assert_eq!(scan.next_page_start, 7);
        assert!(scan.has_next_page);
    }

    #[test]
    fn test_scan_second_page_lines_are_global() {
        let page = snapshot(
            9,
            16,
            vec![
                row(1, MenuEntry::Item("Stream 9".to_string())),
                row(8, MenuEntry::Item("Stream 16".to_string())),
            ],
        );

        let scan = PageScan::of(&page);
        assert_eq!(scan.items[0], (9, "Stream 9".to_string()));
        assert_eq!(scan.items[1], (16, "Stream 16".to_string()));
        assert_eq!(scan.next_page_start, 17);
        assert!(!scan.has_next_page);
    }

    #[test]
    fn test_scan_unselectable_tail_extends_page() {
        let mut rows = vec![row(1, MenuEntry::Item("Song".to_string()))];
        rows.extend((2..=8).map(|n| row(n, MenuEntry::Unselectable(String::new()))));
        let page = snapshot(1, 9, rows);

        let scan = PageScan::of(&page);
        assert_eq!(scan.items.len(), 1);
        assert_eq!(scan.next_page_start, 9);
        assert!(scan.has_next_page);
    }

    fn leaf(line: u32, label: &str) -> MenuNode {
        MenuNode::Leaf { line, label: label.to_string() }
    }

    #[test]
    fn test_flatten_paths() {
        let tree = vec![
            MenuNode::Container {
                line: 1,
                label: "Fancy Server".to_string(),
                children: vec![
                    MenuNode::Container {
                        line: 2,
                        label: "Radio".to_string(),
                        children: vec![leaf(1, "Stream 1")],
                    },
                    leaf(3, "Some Fancy Song 1"),
                ],
            },
            MenuNode::Container {
                line: 2,
                label: "Empty".to_string(),
                children: Vec::new(),
            },
            leaf(3, "Top Level Song"),
        ];

        let paths = flatten_paths(&tree);
        assert_eq!(
            paths,
            vec![
                ServerPath {
                    names: "Fancy Server>Radio>Stream 1".to_string(),
                    indices: "1>2>1".to_string(),
                },
                ServerPath {
                    names: "Fancy Server>Some Fancy Song 1".to_string(),
                    indices: "1>3".to_string(),
                },
                ServerPath {
                    names: "Top Level Song".to_string(),
                    indices: "3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_node_accessors() {
        let node = MenuNode::Container {
            line: 4,
            label: "Music".to_string(),
            children: vec![leaf(1, "Song")],
        };
        assert_eq!(node.line(), 4);
        assert_eq!(node.label(), "Music");
        assert_eq!(node.children().len(), 1);
        assert!(node.is_container());
        assert!(leaf(1, "x").children().is_empty());
    }

    #[test]
    fn test_tree_serializes_to_json() {
        let tree = vec![MenuNode::Container {
            line: 1,
            label: "Radio".to_string(),
            children: vec![leaf(2, "Stream 2")],
        }];

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["Container"]["label"], "Radio");
        assert_eq!(json[0]["Container"]["children"][0]["Leaf"]["line"], 2);
    }
}
