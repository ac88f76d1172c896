use calltrace_studio::explorer::{collapse_all, expand_all, initial_expanded, project};
use calltrace_studio::parser::{EventKind, TraceEvent};
use calltrace_studio::tree::{reconstruct, CallForest, NodeId};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn event(kind: EventKind, name: &str, class: &str, depth: u32) -> TraceEvent {
    TraceEvent::new(kind, name, depth).with_class(class)
}

// 0 Api#handle
//   1 Router#dispatch
//     2 Users#show
//       3 Repo#find
//     4 View#render
// 5 Api#handle
//   6 Cache#fetch
fn forest() -> CallForest {
    reconstruct(vec![
        event(EventKind::Call, "handle", "Api", 0),
        event(EventKind::Call, "dispatch", "Router", 1),
        event(EventKind::Call, "show", "Users", 2),
        event(EventKind::CallReturn, "find", "Repo", 3),
        event(EventKind::CallReturn, "render", "View", 2),
        event(EventKind::Call, "handle", "Api", 0),
        event(EventKind::CallReturn, "fetch", "Cache", 1),
    ])
}

fn ids(raw: &[u32]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId).collect()
}

#[test]
fn test_initial_projection() {
    let forest = forest();
    let expanded = initial_expanded(&forest);
    assert_eq!(project(&forest, &expanded, "", false), ids(&[0, 1, 5, 6]));
}

#[test]
fn test_projection_is_idempotent() {
    let forest = forest();
    let expanded = expand_all(&forest);
    for (search, filtered) in [("", false), ("e", true), ("REPO", true), ("zzz", false)] {
        let first = project(&forest, &expanded, search, filtered);
        let second = project(&forest, &expanded, search, filtered);
        assert_eq!(first, second);
    }
}

#[test]
fn test_expanding_only_adds_rows() {
    let forest = forest();
    let before_set = initial_expanded(&forest);
    let before = project(&forest, &before_set, "", false);

    let mut after_set = before_set.clone();
    after_set.insert(NodeId(1));
    let after = project(&forest, &after_set, "", false);

    // every previous row survives, in the same relative order
    let kept: Vec<NodeId> = after.iter().copied().filter(|id| before.contains(id)).collect();
    assert_eq!(kept, before);
    assert_eq!(after, ids(&[0, 1, 2, 4, 5, 6]));

    // collapsing again removes exactly what was added
    assert_eq!(project(&forest, &before_set, "", false), before);
}

#[test]
fn test_expand_all_and_collapse_all() {
    let forest = forest();
    let all = expand_all(&forest);
    let expected: HashSet<NodeId> = ids(&[0, 1, 2, 5]).into_iter().collect();
    assert_eq!(all, expected);
    assert_eq!(project(&forest, &all, "", false).len(), forest.len());

    assert_eq!(project(&forest, &collapse_all(), "", false), ids(&[0, 5]));
}

#[test]
fn test_search_does_not_force_expand() {
    let forest = forest();
    let expanded = initial_expanded(&forest);
    // Repo#find sits under the collapsed Router#dispatch
    assert!(project(&forest, &expanded, "repo", true).is_empty());

    let all = expand_all(&forest);
    assert_eq!(project(&forest, &all, "repo", true), ids(&[3]));
}

#[test]
fn test_search_without_filter_keeps_all_rows() {
    let forest = forest();
    let all = expand_all(&forest);
    assert_eq!(
        project(&forest, &all, "repo", false),
        project(&forest, &all, "", false)
    );
}

#[test]
fn test_empty_search_matches_everything() {
    let forest = forest();
    let all = expand_all(&forest);
    assert_eq!(project(&forest, &all, "", true).len(), forest.len());
}
