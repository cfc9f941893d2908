//! Merge semantics across a run: history, first-write-wins, conflicts.

use stategraph::{
    ErrorKind, FnNode, FnRouter, InvokeError, MergeRule, Patch, Record, StateGraph, END, START,
};

use super::common::{Calls, Writer};

/// **Scenario**: x and y both write `a` in the same step; the run fails with a merge
/// conflict naming `a`.
#[tokio::test]
async fn concurrent_overwrite_is_a_conflict() {
    let calls = Calls::new();
    let mut graph = StateGraph::new();
    graph.add_node("x", Writer::arc("x", &["a"], &calls));
    graph.add_node("y", Writer::arc("y", &["a"], &calls));
    graph.add_node("z", Writer::arc("z", &["z"], &calls));
    graph.add_edge(START, "x");
    graph.add_edge(START, "y");
    graph.add_edge("x", "z");
    graph.add_edge("y", "z");
    graph.add_edge("z", END);
    let graph = graph.compile().expect("compiles");

    let err = graph.invoke(Record::new(), None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MergeConflict);
    match &err {
        InvokeError::MergeConflict { field, node_id, .. } => {
            assert_eq!(field, "a");
            assert_eq!(node_id, "y");
        }
        other => panic!("expected MergeConflict, got {:?}", other),
    }
    assert_eq!(calls.count("z"), 0);
    assert!(!err.record().contains("a"));
}

/// **Scenario**: A field overwritten N times keeps values 1..N-1 in order in its
/// history companion.
#[tokio::test]
async fn history_holds_every_previous_value_in_order() {
    const ROUNDS: i64 = 6;
    let mut graph = StateGraph::new();
    graph.add_node(
        "bump",
        FnNode::arc(|r: &Record| {
            let v = r.get_i64("v").unwrap_or(0) + 1;
            Ok(Patch::new().with("v", v))
        }),
    );
    graph.add_edge(START, "bump");
    graph.add_conditional_edges(
        "bump",
        FnRouter::arc(["AGAIN", "DONE"], |r: &Record| {
            if r.get_i64("v") < Some(ROUNDS) { "AGAIN" } else { "DONE" }.to_string()
        }),
        [("AGAIN", "bump"), ("DONE", END)],
    );
    graph.add_merge_rule("v", MergeRule::append_to_history("v_history"));
    let graph = graph.compile().expect("compiles");

    let out = graph.invoke(Record::new(), None).await.unwrap();

    assert_eq!(out.get_i64("v"), Some(ROUNDS));
    let expected: Vec<i64> = (1..ROUNDS).collect();
    assert_eq!(out.get("v_history"), Some(&serde_json::json!(expected)));
}

/// **Scenario**: First-write-wins fields keep the caller's value and never conflict.
#[tokio::test]
async fn first_write_wins_keeps_initial_value() {
    let calls = Calls::new();
    let mut graph = StateGraph::new();
    graph.add_node("x", Writer::arc("x", &["origin"], &calls));
    graph.add_node("y", Writer::arc("y", &["origin"], &calls));
    graph.add_edge(START, "x");
    graph.add_edge(START, "y");
    graph.add_edge("x", END);
    graph.add_edge("y", END);
    graph.add_merge_rule("origin", MergeRule::FirstWriteWins);
    let graph = graph.compile().expect("compiles");

    let out = graph
        .invoke(Record::new().with("origin", "caller"), None)
        .await
        .unwrap();
    assert_eq!(out.get_str("origin"), Some("caller"));

    // Both write `origin` in one step; x comes first in the frontier.
    let out = graph.invoke(Record::new(), None).await.unwrap();
    assert_eq!(out.get_str("origin"), Some("x#2"));
}

/// **Scenario**: A history companion that the caller seeded with a non-array fails
/// the run instead of being clobbered.
#[tokio::test]
async fn non_array_history_is_reported() {
    let mut graph = StateGraph::new();
    graph.add_node("w", FnNode::arc(|_: &Record| Ok(Patch::new().with("v", 2))));
    graph.add_edge(START, "w");
    graph.add_edge("w", END);
    graph.add_merge_rule("v", MergeRule::append_to_history("v_history"));
    let graph = graph.compile().expect("compiles");

    let input = Record::new().with("v", 1).with("v_history", "oops");
    let err = graph.invoke(input, None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidHistory);
    assert_eq!(err.record().get_i64("v"), Some(1));
}

/// **Scenario**: x replaces a history-tracked field while y writes its history
/// companion directly. The step is a merge conflict on the companion whichever sibling
/// comes first, and the record keeps its pre-step values.
#[tokio::test]
async fn sibling_write_to_history_companion_is_a_conflict() {
    for (first, second) in [("x", "y"), ("y", "x")] {
        let mut graph = StateGraph::new();
        graph.add_node(
            "x",
            FnNode::arc(|_: &Record| Ok(Patch::new().with("plan", "new"))),
        );
        graph.add_node(
            "y",
            FnNode::arc(|_: &Record| {
                Ok(Patch::new().with("plan_history", serde_json::json!(["reset"])))
            }),
        );
        graph.add_edge(START, first);
        graph.add_edge(START, second);
        graph.add_edge("x", END);
        graph.add_edge("y", END);
        graph.add_merge_rule("plan", MergeRule::append_to_history("plan_history"));
        let graph = graph.compile().expect("compiles");

        let err = graph
            .invoke(Record::new().with("plan", "old"), None)
            .await
            .unwrap_err();

        match &err {
            InvokeError::MergeConflict { field, node_id, .. } => {
                assert_eq!(field, "plan_history");
                assert_eq!(node_id, second);
            }
            other => panic!("expected MergeConflict, got {:?}", other),
        }
        assert_eq!(err.record().get_str("plan"), Some("old"));
        assert!(!err.record().contains("plan_history"));
    }
}

/// **Scenario**: A patch whose history companion is invalid is rejected whole: none of
/// its fields reach the reported record, even ones merged before the failing field.
#[tokio::test]
async fn invalid_history_leaves_no_partial_patch() {
    let mut graph = StateGraph::new();
    graph.add_node(
        "w",
        FnNode::arc(|_: &Record| Ok(Patch::new().with("a_new", 1).with("v", 2))),
    );
    graph.add_edge(START, "w");
    graph.add_edge("w", END);
    graph.add_merge_rule("v", MergeRule::append_to_history("v_history"));
    let graph = graph.compile().expect("compiles");

    let input = Record::new().with("v", 1).with("v_history", "oops");
    let err = graph.invoke(input.clone(), None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidHistory);
    assert!(!err.record().contains("a_new"));
    assert_eq!(err.record(), &input);
}
