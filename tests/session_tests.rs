use calltrace_studio::explorer::{materialize, ActiveView, ExplorerSession, Viewport};
use calltrace_studio::parser::{BytesSource, ReaderSource};
use calltrace_studio::tree::NodeId;
use pretty_assertions::assert_eq;

const TRACE: &str = r#"{
    "version": "1.0",
    "timestamp": "2024-05-01T12:00:00Z",
    "events": [
        {"event": "call", "method_name": "checkout", "defined_class": "Cart", "depth": 0},
        {"event": "call", "method_name": "total", "defined_class": "Cart", "depth": 1},
        {"event": "call_return", "method_name": "price", "defined_class": "Item", "depth": 2, "duration": 0.004},
        {"event": "call_return", "method_name": "price", "defined_class": "Item", "depth": 2, "duration": 0.002},
        {"event": "return", "method_name": "total", "depth": 1, "duration": 0.007},
        {"event": "call_return", "method_name": "charge", "defined_class": "Payment", "depth": 1, "duration": 0.05},
        {"event": "return", "method_name": "checkout", "depth": 0, "return_value": ":ok", "duration": 0.06}
    ]
}"#;

fn loaded() -> ExplorerSession {
    let mut session = ExplorerSession::new();
    session
        .load_from(&mut BytesSource::new(TRACE.as_bytes().to_vec()))
        .unwrap();
    session
}

#[test]
fn test_load_builds_everything() {
    let session = loaded();
    let trace = session.loaded().unwrap();

    assert_eq!(trace.version, "1.0");
    assert_eq!(trace.event_count, 7);
    assert_eq!(trace.forest.len(), 5);
    assert_eq!(trace.report.total_calls, 5);
    assert_eq!(session.visible_rows(), &[NodeId(0), NodeId(1), NodeId(4)]);
}

#[test]
fn test_stdin_style_reader_source() {
    let mut session = ExplorerSession::new();
    let mut source = ReaderSource::new(TRACE.as_bytes(), "<stdin>");
    session.load_from(&mut source).unwrap();
    assert!(session.is_loaded());
}

#[test]
fn test_invalid_input_leaves_session_untouched() {
    let mut session = loaded();
    let generation = session.layout_generation();

    let inputs: [&[u8]; 4] = [
        b"not json",
        b"17",
        br#"{"events": {}}"#,
        br#"[{"event": "jump"}]"#,
    ];
    for bad in inputs {
        assert!(session.load_from(&mut BytesSource::new(bad.to_vec())).is_err());
    }

    assert_eq!(session.forest().map(|f| f.len()), Some(5));
    assert_eq!(session.layout_generation(), generation);
}

#[test]
fn test_load_replaces_previous_trace() {
    let mut session = loaded();
    session
        .load_from(&mut BytesSource::new(
            br#"[{"event":"call_return","method_name":"only","depth":0}]"#.to_vec(),
        ))
        .unwrap();

    let trace = session.loaded().unwrap();
    assert_eq!(trace.forest.len(), 1);
    assert_eq!(trace.version, "1.0");
    assert_eq!(session.view().map(|v| v.selected), Some(None));
}

#[test]
fn test_toggle_and_search_update_rows() {
    let mut session = loaded();
    let generation = session.layout_generation();

    session.toggle(NodeId(1));
    assert_eq!(session.visible_rows().len(), 5);
    assert!(session.layout_generation() > generation);

    session.set_search("PRICE");
    session.set_filtered_only(true);
    assert_eq!(session.visible_rows(), &[NodeId(2), NodeId(3)]);

    session.set_filtered_only(false);
    session.collapse_all();
    assert_eq!(session.visible_rows(), &[NodeId(0)]);
}

#[test]
fn test_navigate_to_method_reveals_example() {
    let mut session = loaded();
    session.set_active_view(ActiveView::Performance);

    let stat = session.report().unwrap().method("Item#price").unwrap().clone();
    let row = session.navigate_to_method(&stat);

    assert_eq!(row, Some(2));
    assert_eq!(session.view().unwrap().active_view, ActiveView::Tree);
    assert_eq!(session.view().unwrap().selected, Some(NodeId(2)));
    assert_eq!(session.selected_row(), Some(2));
}

#[test]
fn test_navigate_to_unknown_node() {
    let mut session = loaded();
    assert_eq!(session.navigate_to(NodeId(99)), None);
    assert_eq!(session.view().unwrap().selected, None);
}

#[test]
fn test_window_over_session_rows() {
    let mut session = loaded();
    session.expand_all();

    let window = session.window(Viewport::new(20.0, 40.0), 20.0, 0);
    assert_eq!((window.start, window.end), (1, 3));

    let rows = materialize(&session, &window);
    assert_eq!(
        rows,
        vec![(1, NodeId(1), 20.0), (2, NodeId(2), 40.0)]
    );
}

#[test]
fn test_reset_then_reload() {
    let mut session = loaded();
    session.reset();
    assert!(!session.is_loaded());
    assert!(session.visible_rows().is_empty());

    session
        .load_from(&mut BytesSource::new(TRACE.as_bytes().to_vec()))
        .unwrap();
    assert_eq!(session.visible_rows().len(), 3);
}
