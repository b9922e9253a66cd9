//! Test helpers for menu navigation tests
//!
//! [`FakeMenuDevice`] keeps its own remote cursor and answers `List_Info`
//! with eight-row pages padded with unselectable rows, like a real receiver.

#![allow(dead_code)]

use rxv_api::menu::{Cursor, MenuDevice, MenuRequest};
use rxv_api::{ApiError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use xmltree::Element;

pub const PAGE_SIZE: u32 = 8;

/// One entry of a fixture menu tree
#[derive(Debug, Clone)]
pub enum FixtureNode {
    Container(String, Vec<FixtureNode>),
    Item(String),
    Unplayable(String),
}

impl FixtureNode {
    fn label(&self) -> &str {
        match self {
            FixtureNode::Container(label, _) | FixtureNode::Item(label) | FixtureNode::Unplayable(label) => label,
        }
    }

    fn attribute(&self) -> &'static str {
        match self {
            FixtureNode::Container(..) => "Container",
            FixtureNode::Item(_) => "Item",
            FixtureNode::Unplayable(_) => "Unplayable Item",
        }
    }
}

pub fn container(label: &str, children: Vec<FixtureNode>) -> FixtureNode {
    FixtureNode::Container(label.to_string(), children)
}

pub fn item(label: &str) -> FixtureNode {
    FixtureNode::Item(label.to_string())
}

pub fn unplayable(label: &str) -> FixtureNode {
    FixtureNode::Unplayable(label.to_string())
}

/// Media server tree used by most scenarios
pub fn server_fixture() -> Vec<FixtureNode> {
    let mut fancy = vec![
        container(
            "Music",
            vec![container(
                "Some Performer",
                vec![item("Song Title 1"), item("Song Title 2")],
            )],
        ),
        container(
            "Radio",
            (1..=20).map(|n| item(&format!("Stream {}", n))).collect(),
        ),
    ];
    fancy.extend((1..=7).map(|n| item(&format!("Some Fancy Song {}", n))));

    vec![
        container("Fancy Server", fancy),
        container("Other Server", vec![unplayable("Nothing to see here")]),
    ]
}

pub fn net_radio_fixture() -> Vec<FixtureNode> {
    vec![
        container(
            "Bookmarks",
            vec![
                container("Internet", vec![item("Jazz Radio"), item("Radio Paradise")]),
                container("Local", Vec::new()),
            ],
        ),
        container("Genres", vec![item("Ambient")]),
    ]
}

#[derive(Debug)]
struct CursorState {
    input: String,
    path: Vec<usize>,
    current_line: u32,
    selected: Option<Vec<String>>,
    busy_remaining: u32,
    requests: Vec<(String, MenuRequest)>,
    input_changes: Vec<String>,
}

/// A receiver whose menu is a fixture tree
#[derive(Debug)]
pub struct FakeMenuDevice {
    inputs: BTreeMap<String, Option<String>>,
    trees: BTreeMap<String, (String, Vec<FixtureNode>)>,
    busy_after_command: u32,
    ignore_select: bool,
    state: RefCell<CursorState>,
}

impl FakeMenuDevice {
    /// Fixture receiver with `SERVER` selected
    pub fn new() -> Self {
        let mut inputs = BTreeMap::new();
        inputs.insert("HDMI1".to_string(), None);
        inputs.insert("SERVER".to_string(), Some("SERVER".to_string()));
        inputs.insert("NET RADIO".to_string(), Some("NET_RADIO".to_string()));

        let mut trees = BTreeMap::new();
        trees.insert("SERVER".to_string(), ("SERVER".to_string(), server_fixture()));
        trees.insert("NET_RADIO".to_string(), ("NET RADIO".to_string(), net_radio_fixture()));

        Self {
            inputs,
            trees,
            busy_after_command: 0,
            ignore_select: false,
            state: RefCell::new(CursorState {
                input: "SERVER".to_string(),
                path: Vec::new(),
                current_line: 1,
                selected: None,
                busy_remaining: 0,
                requests: Vec::new(),
                input_changes: Vec::new(),
            }),
        }
    }

    /// Replace the server tree below the root
    pub fn with_server_tree(mut self, children: Vec<FixtureNode>) -> Self {
        self.trees
            .insert("SERVER".to_string(), ("SERVER".to_string(), children));
        self
    }

    /// Start on another input
    pub fn on_input(self, input: &str) -> Self {
        self.state.borrow_mut().input = input.to_string();
        self
    }

    /// Report `Busy` for the next `reads` status reads after every command
    pub fn with_busy_reads(mut self, reads: u32) -> Self {
        self.busy_after_command = reads;
        self
    }

    /// Stay busy from the first read on
    pub fn always_busy(self) -> Self {
        self.state.borrow_mut().busy_remaining = u32::MAX;
        self.with_busy_reads(u32::MAX)
    }

    /// Accept `Sel` without entering containers
    pub fn ignoring_select(mut self) -> Self {
        self.ignore_select = true;
        self
    }

    /// Labels from the root to the last selected leaf
    pub fn selected(&self) -> Option<Vec<String>> {
        self.state.borrow().selected.clone()
    }

    pub fn input(&self) -> String {
        self.state.borrow().input.clone()
    }

    pub fn input_changes(&self) -> Vec<String> {
        self.state.borrow().input_changes.clone()
    }

    pub fn requests(&self) -> Vec<MenuRequest> {
        self.state.borrow().requests.iter().map(|(_, r)| *r).collect()
    }

    pub fn count_requests(&self, predicate: impl Fn(&MenuRequest) -> bool) -> usize {
        self.requests().iter().filter(|r| predicate(r)).count()
    }

    pub fn jumps(&self) -> Vec<u32> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                MenuRequest::JumpLine(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    fn layer<'a>(root_name: &'a str, root: &'a [FixtureNode], path: &[usize]) -> (&'a str, &'a [FixtureNode], Vec<String>) {
        let mut name = root_name;
        let mut children = root;
        let mut labels = Vec::new();
        for &index in path {
            if let Some(FixtureNode::Container(label, nested)) = children.get(index) {
                name = label;
                children = nested;
                labels.push(label.clone());
            }
        }
        (name, children, labels)
    }

    fn list_info(&self, source: &str, state: &mut CursorState) -> String {
        let (root_name, root) = &self.trees[source];
        let (name, children, _) = Self::layer(root_name, root, &state.path);

        let ready = if state.busy_remaining > 0 {
            state.busy_remaining -= 1;
            "Busy"
        } else {
            "Ready"
        };

        let page_start = page_start(state.current_line);
        let rows: String = (0..PAGE_SIZE)
            .map(|k| {
                let line = page_start + k;
                let (text, attribute) = match children.get((line - 1) as usize) {
                    Some(node) => (node.label(), node.attribute()),
                    None => ("", "Unselectable"),
                };
                format!(
                    "<Line_{n}><Txt>{text}</Txt><Attribute>{attribute}</Attribute></Line_{n}>",
                    n = k + 1
                )
            })
            .collect();

        format!(
            r#"<YAMAHA_AV rsp="GET" RC="0"><{source}><List_Info><Menu_Status>{ready}</Menu_Status><Menu_Layer>{layer}</Menu_Layer><Menu_Name>{name}</Menu_Name><Current_List>{rows}</Current_List><Cursor_Position><Current_Line>{line}</Current_Line><Max_Line>{max}</Max_Line></Cursor_Position></List_Info></{source}></YAMAHA_AV>"#,
            layer = state.path.len() + 1,
            line = state.current_line,
            max = children.len(),
        )
    }

    fn select_line(&self, source: &str, state: &mut CursorState, line: u32) {
        if self.ignore_select {
            return;
        }
        let (root_name, root) = &self.trees[source];
        let (_, children, mut labels) = Self::layer(root_name, root, &state.path);

        let index = (line.max(1) - 1) as usize;
        match children.get(index) {
            Some(FixtureNode::Container(..)) => {
                state.path.push(index);
                state.current_line = 1;
            }
            Some(leaf) => {
                labels.push(leaf.label().to_string());
                state.selected = Some(labels);
            }
            None => {}
        }
    }
}

impl Default for FakeMenuDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn page_start(current_line: u32) -> u32 {
    (current_line.max(1) - 1) / PAGE_SIZE * PAGE_SIZE + 1
}

impl MenuDevice for FakeMenuDevice {
    fn current_input(&self) -> Result<String> {
        Ok(self.state.borrow().input.clone())
    }

    fn source_name_for(&self, input: &str) -> Result<Option<String>> {
        Ok(self.inputs.get(input).cloned().flatten())
    }

    fn set_active_input(&self, input: &str) -> Result<()> {
        if !self.inputs.contains_key(input) {
            return Err(ApiError::InvalidParameter(format!("unknown input '{}'", input)));
        }
        let mut state = self.state.borrow_mut();
        state.input = input.to_string();
        state.path.clear();
        state.current_line = 1;
        state.input_changes.push(input.to_string());
        Ok(())
    }

    fn send_menu_request(&self, source: &str, request: &MenuRequest) -> Result<Element> {
        let mut state = self.state.borrow_mut();
        state.requests.push((source.to_string(), *request));

        if !self.trees.contains_key(source) {
            return Err(ApiError::ResponseError {
                code: "1".to_string(),
                body: format!("no menu for {}", source),
            });
        }

        let reply = match request {
            MenuRequest::ListInfo => self.list_info(source, &mut state),
            command => {
                let (root_name, root) = &self.trees[source];
                let (_, children, _) = Self::layer(root_name, root, &state.path);
                let max_line = children.len() as u32;

                match *command {
                    MenuRequest::JumpLine(line) => {
                        if line == 0 || line > max_line {
                            return Err(ApiError::ResponseError {
                                code: "4".to_string(),
                                body: format!("line {} out of range", line),
                            });
                        }
                        state.current_line = line;
                    }
                    MenuRequest::DirectSelect(offset) => {
                        let line = page_start(state.current_line) + offset - 1;
                        self.select_line(source, &mut state, line);
                    }
                    MenuRequest::Cursor(Cursor::Select) => {
                        let line = state.current_line;
                        self.select_line(source, &mut state, line);
                    }
                    MenuRequest::Cursor(Cursor::Home) => {
                        state.path.clear();
                        state.current_line = 1;
                    }
                    MenuRequest::Cursor(Cursor::Return) => {
                        state.path.pop();
                        state.current_line = 1;
                    }
                    MenuRequest::Cursor(Cursor::Up) => {
                        state.current_line = state.current_line.saturating_sub(1).max(1);
                    }
                    MenuRequest::Cursor(Cursor::Down) => {
                        state.current_line = (state.current_line + 1).min(max_line.max(1));
                    }
                    MenuRequest::Cursor(Cursor::Left) | MenuRequest::Cursor(Cursor::Right) => {}
                    MenuRequest::ListInfo => {}
                }

                state.busy_remaining = self.busy_after_command;
                r#"<YAMAHA_AV rsp="PUT" RC="0"></YAMAHA_AV>"#.to_string()
            }
        };

        Element::parse(reply.as_bytes()).map_err(|e| ApiError::ParseError(e.to_string()))
    }
}
