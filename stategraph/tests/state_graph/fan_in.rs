//! Join barriers: a fan-in node runs once per pass, after all predecessors.

use stategraph::{Record, StateGraph, END, START};

use super::common::{Calls, Writer};

/// **Scenario**: Branches of different length meet at a join; the join sees every
/// predecessor's field and runs exactly once.
#[tokio::test]
async fn join_waits_for_longer_branch() {
    let calls = Calls::new();
    let mut graph = StateGraph::new();
    graph.add_node("a", Writer::arc("a", &["a_out"], &calls));
    graph.add_node("a2", Writer::arc("a2", &["a2_out"], &calls));
    graph.add_node("b", Writer::arc("b", &["b_out"], &calls));
    graph.add_node("join", Writer::arc("join", &["join_out"], &calls));
    graph.add_edge(START, "a");
    graph.add_edge(START, "b");
    graph.add_edge("a", "a2");
    graph.add_edge("a2", "join");
    graph.add_edge("b", "join");
    graph.add_edge("join", END);
    let graph = graph.compile().expect("compiles");

    assert_eq!(graph.join_predecessors("join"), Some(vec!["a2", "b"]));

    let out = graph.invoke(Record::new(), None).await.unwrap();

    assert_eq!(calls.count("join"), 1);
    let seen = &calls.inputs("join")[0];
    for field in ["a_out", "a2_out", "b_out"] {
        assert!(seen.contains(field), "join ran without `{}`", field);
    }
    assert_eq!(out.get_str("join_out"), Some("join#1"));
    assert_eq!(calls.order().last().map(String::as_str), Some("join"));
}

/// **Scenario**: Three-way fan-out and fan-in; siblings run in one step, join once.
#[tokio::test]
async fn three_way_fan_in_runs_join_once() {
    let calls = Calls::new();
    let mut graph = StateGraph::new();
    for id in ["p", "q", "r"] {
        graph.add_node(id, Writer::arc(id, &[id], &calls));
        graph.add_edge(START, id);
        graph.add_edge(id, "join");
    }
    graph.add_node("join", Writer::arc("join", &["joined"], &calls));
    graph.add_edge("join", END);
    let graph = graph.compile().expect("compiles");

    let out = graph.invoke_with_budget(Record::new(), 4).await.unwrap();

    assert_eq!(calls.order(), vec!["p", "q", "r", "join"]);
    assert_eq!(calls.inputs("join")[0].len(), 3);
    assert_eq!(out.len(), 4);
}

/// **Scenario**: A node with a single predecessor is not a join.
#[test]
fn single_predecessor_is_not_a_join() {
    let calls = Calls::new();
    let mut graph = StateGraph::new();
    graph.add_node("a", Writer::arc("a", &["a"], &calls));
    graph.add_node("b", Writer::arc("b", &["b"], &calls));
    graph.add_edge(START, "a");
    graph.add_edge("a", "b");
    graph.add_edge("b", END);
    let graph = graph.compile().expect("compiles");

    assert_eq!(graph.join_predecessors("b"), None);
}
