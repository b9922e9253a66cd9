//! Menu navigation scenarios against a scripted receiver
//!
//! The fixture server is
//! `SERVER -> {Fancy Server -> {Music -> {Some Performer -> {Song Title 1, 2}},
//! Radio -> {Stream 1..20}, Some Fancy Song 1..7}, Other Server -> {Nothing to see here}}`
//! shown eight rows per page.

mod helpers;

use helpers::{container, item, unplayable, FakeMenuDevice};
use rxv_api::menu::{flatten_paths, Cursor, MenuNavigator, MenuNode, MenuRequest};
use rxv_api::{ApiError, PollConfig};
use rstest::rstest;
use std::time::Duration;

fn navigator(device: &FakeMenuDevice) -> MenuNavigator<'_, FakeMenuDevice> {
    MenuNavigator::new(device, PollConfig::immediate(10))
}

fn labels(nodes: &[MenuNode]) -> Vec<&str> {
    nodes.iter().map(MenuNode::label).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_walk_fixture_tree() {
    let device = FakeMenuDevice::new();
    let tree = navigator(&device).walk(&[]).unwrap();

    assert_eq!(labels(&tree), vec!["Fancy Server", "Other Server"]);

    let fancy = tree[0].children();
    let mut expected = vec!["Music".to_string(), "Radio".to_string()];
    expected.extend((1..=7).map(|n| format!("Some Fancy Song {}", n)));
    assert_eq!(labels(fancy), expected);

    let radio = &fancy[1];
    assert_eq!(radio.line(), 2);
    let streams: Vec<String> = (1..=20).map(|n| format!("Stream {}", n)).collect();
    assert_eq!(labels(radio.children()), streams);
    assert_eq!(radio.children()[16].line(), 17);

    // the second page of Fancy Server starts at line 9
    assert_eq!(fancy[8].label(), "Some Fancy Song 7");
    assert_eq!(fancy[8].line(), 9);

    let other = tree[1].children();
    assert_eq!(
        other,
        &[MenuNode::Leaf {
            line: 1,
            label: "Nothing to see here".to_string()
        }]
    );
}

#[test]
fn test_server_paths_in_walk_order() {
    let device = FakeMenuDevice::new();
    let tree = navigator(&device).walk(&[]).unwrap();
    let paths = flatten_paths(&tree);

    assert_eq!(paths.len(), 2 + 20 + 7 + 1);
    assert_eq!(paths[0].names, "Fancy Server>Music>Some Performer>Song Title 1");
    assert_eq!(paths[0].indices, "1>1>1>1");
    assert_eq!(paths[1].indices, "1>1>1>2");
    assert_eq!(paths[2].names, "Fancy Server>Radio>Stream 1");
    assert_eq!(paths[18].names, "Fancy Server>Radio>Stream 17");
    assert_eq!(paths[18].indices, "1>2>17");
    assert_eq!(paths[22].names, "Fancy Server>Some Fancy Song 1");
    assert_eq!(paths[22].indices, "1>3");
    assert_eq!(paths[28].indices, "1>9");
    assert_eq!(paths[29].names, "Other Server>Nothing to see here");
    assert_eq!(paths[29].indices, "2>1");
}

#[test]
fn test_nine_entries_advance_one_page() {
    let device = FakeMenuDevice::new()
        .with_server_tree((1..=9).map(|n| item(&format!("Track {}", n))).collect());
    let tree = navigator(&device).walk(&[]).unwrap();

    assert_eq!(tree.len(), 9);
    assert_eq!(tree[8].line(), 9);
    assert_eq!(device.jumps(), vec![9]);
}

#[test]
fn test_layer_grouping_spans_pages() {
    // a container on the second page still precedes items from the first
    let mut children: Vec<_> = (1..=8).map(|n| item(&format!("Track {}", n))).collect();
    children.push(container("Late Folder", vec![item("Inside")]));
    children.push(unplayable("Notice"));
    let device = FakeMenuDevice::new().with_server_tree(children);

    let tree = navigator(&device).walk(&[]).unwrap();

    assert_eq!(tree[0].label(), "Late Folder");
    assert_eq!(tree[0].line(), 9);
    assert_eq!(tree[1].label(), "Track 1");
    assert_eq!(tree[9].label(), "Notice");
    assert_eq!(tree[9].line(), 10);
}

#[test]
fn test_walk_from_prefix() {
    let device = FakeMenuDevice::new();
    let prefix = vec![(1, "Fancy Server".to_string()), (1, "Music".to_string())];
    let tree = navigator(&device).walk(&prefix).unwrap();

    assert_eq!(labels(&tree), vec!["Some Performer"]);
    assert_eq!(labels(tree[0].children()), vec!["Song Title 1", "Song Title 2"]);
}

#[test]
fn test_walk_detects_wrong_layer() {
    let device = FakeMenuDevice::new().ignoring_select();
    let result = navigator(&device).walk(&[(1, "Fancy Server".to_string())]);

    match result {
        Err(ApiError::UnexpectedLayer { expected, found }) => {
            assert_eq!(expected, "Fancy Server");
            assert_eq!(found, "SERVER");
        }
        other => panic!("Expected UnexpectedLayer, got {:?}", other),
    }
}

#[test]
fn test_walk_tolerates_busy_receiver() {
    let device = FakeMenuDevice::new().with_busy_reads(3);
    let tree = navigator(&device).walk(&[]).unwrap();

    assert_eq!(flatten_paths(&tree).len(), 30);
}

#[test]
fn test_select_by_indices() {
    let device = FakeMenuDevice::new().on_input("HDMI1");
    navigator(&device).select(vec![1u32, 2, 17]).unwrap();

    assert_eq!(
        device.selected(),
        Some(strings(&["Fancy Server", "Radio", "Stream 17"]))
    );
    assert_eq!(device.input_changes(), vec!["SERVER"]);
    assert_eq!(device.jumps(), vec![1, 2, 17]);
    assert_eq!(
        device.count_requests(|r| *r == MenuRequest::Cursor(Cursor::Select)),
        3
    );
}

#[rstest]
#[case("Fancy Server>Radio>Stream 17", vec![1, 2, 17])]
#[case("Fancy Server>Music>Some Performer>Song Title 2", vec![1, 1, 1, 2])]
#[case("Fancy Server>Some Fancy Song 7", vec![1, 9])]
#[case("Other Server>Nothing to see here", vec![2, 1])]
fn test_select_by_names_matches_indices(#[case] names: &str, #[case] indices: Vec<u32>) {
    let by_names = FakeMenuDevice::new();
    navigator(&by_names).select(names).unwrap();

    let by_indices = FakeMenuDevice::new();
    navigator(&by_indices).select(indices).unwrap();

    assert!(by_names.selected().is_some());
    assert_eq!(by_names.selected(), by_indices.selected());
}

#[test]
fn test_select_missing_name_is_path_not_found() {
    let device = FakeMenuDevice::new();
    let result = navigator(&device).select("Fancy Server>Radio>Stream 66");

    match result {
        Err(ApiError::PathNotFound { path, segment }) => {
            assert_eq!(path, "Fancy Server>Radio>Stream 66");
            assert_eq!(segment, "Stream 66");
        }
        other => panic!("Expected PathNotFound, got {:?}", other),
    }
    // every page of Radio was read
    assert_eq!(&device.jumps()[2..], &[9, 17]);
    assert_eq!(device.selected(), None);
}

#[test]
fn test_select_rejects_zero_index() {
    let device = FakeMenuDevice::new();
    let result = navigator(&device).select(vec![1u32, 0]);

    assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
    assert!(device.requests().is_empty());
}

#[test]
fn test_out_of_range_index_surfaces_receiver_error() {
    let device = FakeMenuDevice::new();
    let result = navigator(&device).select(vec![1u32, 2, 21]);

    assert!(matches!(result, Err(ApiError::ResponseError { code, .. }) if code == "4"));
}

#[test]
fn test_menu_unavailable_without_source() {
    let device = FakeMenuDevice::new().on_input("HDMI1");
    let menu = navigator(&device);

    for result in [
        menu.status().map(|_| ()),
        menu.jump_to_line(3),
        menu.move_cursor(Cursor::Down),
        menu.walk(&[]).map(|_| ()),
    ] {
        match result {
            Err(ApiError::MenuUnavailable { input, .. }) => assert_eq!(input, "HDMI1"),
            other => panic!("Expected MenuUnavailable, got {:?}", other),
        }
    }
    assert!(device.requests().is_empty());
}

#[test]
fn test_busy_receiver_times_out() {
    let device = FakeMenuDevice::new().always_busy();
    let result = navigator(&device).wait_ready();

    assert!(matches!(result, Err(ApiError::Timeout { attempts: 10 })));
    assert_eq!(device.requests().len(), 11);
}

#[test]
fn test_cursor_moves() {
    let device = FakeMenuDevice::new();
    let menu = navigator(&device);

    menu.down().unwrap();
    assert_eq!(menu.status().unwrap().current_line, 2);
    menu.sel().unwrap();
    assert_eq!(menu.status().unwrap().name, "Other Server");
    assert_eq!(
        device.count_requests(|r| *r == MenuRequest::Cursor(Cursor::Select)),
        1
    );
    menu.back().unwrap();
    assert_eq!(menu.status().unwrap().layer, 1);
}

#[test]
fn test_net_radio_selects_by_direct_line() {
    let device = FakeMenuDevice::new().with_busy_reads(1);
    navigator(&device)
        .select_net_radio("Bookmarks>Internet>Radio Paradise", "NET RADIO", 20, Duration::ZERO)
        .unwrap();

    assert_eq!(device.input(), "NET RADIO");
    assert_eq!(
        device.selected(),
        Some(strings(&["Bookmarks", "Internet", "Radio Paradise"]))
    );
    assert_eq!(
        device.count_requests(|r| matches!(r, MenuRequest::DirectSelect(_))),
        3
    );
    assert!(device.requests().contains(&MenuRequest::DirectSelect(2)));
}

#[test]
fn test_net_radio_missing_station_times_out() {
    let device = FakeMenuDevice::new();
    let result = navigator(&device).select_net_radio("Bookmarks>Nowhere", "NET RADIO", 5, Duration::ZERO);

    assert!(matches!(result, Err(ApiError::Timeout { attempts: 5 })));
    assert_eq!(device.selected(), None);
}
