//! Compile-time validation seen through the public API.

use stategraph::{FnNode, FnRouter, Patch, Record, StateGraph, ValidationError, END, START};

fn noop() -> std::sync::Arc<dyn stategraph::Node> {
    FnNode::arc(|_: &Record| Ok(Patch::new()))
}

/// **Scenario**: A label table that never reaches END is rejected before any node runs.
#[test]
fn label_table_without_end_is_rejected() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop()).add_node("b", noop());
    graph.add_edge(START, "a");
    graph.add_edge("b", "a");
    graph.add_conditional_edges(
        "a",
        FnRouter::arc(["AGAIN", "OTHER"], |_: &Record| "AGAIN".to_string()),
        [("AGAIN", "a"), ("OTHER", "b")],
    );

    match graph.compile() {
        Err(ValidationError::MissingTerminal { node }) => assert_eq!(node, "a"),
        other => panic!("expected MissingTerminal, got {:?}", other.err()),
    }
}

/// **Scenario**: A static edge to a node that was never added is rejected.
#[test]
fn edge_to_unknown_node_is_rejected() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop());
    graph.add_edge(START, "a");
    graph.add_edge("a", "ghost");

    assert_eq!(
        graph.compile().err(),
        Some(ValidationError::NodeNotFound("ghost".into()))
    );
}

/// **Scenario**: A label table entry pointing at an unknown node is rejected.
#[test]
fn label_to_unknown_node_is_rejected() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop());
    graph.add_edge(START, "a");
    graph.add_conditional_edges(
        "a",
        FnRouter::arc(["GO", "DONE"], |_: &Record| "DONE".to_string()),
        [("GO", "ghost"), ("DONE", END)],
    );

    assert_eq!(
        graph.compile().err(),
        Some(ValidationError::NodeNotFound("ghost".into()))
    );
}

/// **Scenario**: A declared router label missing from the table is rejected.
#[test]
fn unmapped_router_label_is_rejected() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop());
    graph.add_edge(START, "a");
    graph.add_conditional_edges(
        "a",
        FnRouter::arc(["RETRY", "DONE"], |_: &Record| "DONE".to_string()),
        [("DONE", END)],
    );

    assert_eq!(
        graph.compile().err(),
        Some(ValidationError::UnmappedLabel {
            node: "a".into(),
            label: "RETRY".into(),
        })
    );
}

/// **Scenario**: A graph with nothing leaving START cannot run.
#[test]
fn graph_without_entry_is_rejected() {
    let mut graph = StateGraph::new();
    graph.add_node("a", noop());
    graph.add_edge("a", END);

    assert_eq!(graph.compile().err(), Some(ValidationError::MissingEntry));
}
