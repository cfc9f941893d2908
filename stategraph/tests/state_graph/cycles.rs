//! Conditional loops and the step budget.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stategraph::{ErrorKind, FnNode, FnRouter, InvokeError, Patch, Record, StateGraph, END, START};

use super::common::{scenario_graph, Calls};

/// **Scenario**: The loop routes back to START once. x and y run twice, z runs twice
/// and each of z's fields keeps one history entry.
#[tokio::test]
async fn loop_back_to_start_once_then_end() {
    let calls = Calls::new();
    let graph = scenario_graph(&calls, |r| r.get_str("z_out") == Some("z#1"));

    let out = graph.invoke_with_budget(Record::new(), 50).await.unwrap();

    assert_eq!(calls.count("x"), 2);
    assert_eq!(calls.count("y"), 2);
    assert_eq!(calls.count("z"), 2);
    assert_eq!(out.get_str("z_out"), Some("z#2"));
    assert_eq!(out.get("z_out_history"), Some(&serde_json::json!(["z#1"])));
    assert_eq!(out.get("z_note_history"), Some(&serde_json::json!(["z#1"])));
    assert_eq!(out.get_str("x_out"), Some("x#2"));
    for seen in calls.inputs("z") {
        assert!(seen.contains("x_out") && seen.contains("y_out"));
    }
}

/// **Scenario**: The loop never exits; with budget 5 the run stops after x, y, z, x, y.
/// The partial record reflects the last completed patches.
#[tokio::test]
async fn endless_loop_hits_budget_of_five() {
    let calls = Calls::new();
    let graph = scenario_graph(&calls, |_| true);

    let err = graph.invoke_with_budget(Record::new(), 5).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StepBudgetExceeded);
    assert!(matches!(err, InvokeError::StepBudgetExceeded { budget: 5, .. }));
    assert_eq!(calls.order(), vec!["x", "y", "z", "x", "y"]);
    let record = err.record();
    assert_eq!(record.get_str("x_out"), Some("x#2"));
    assert_eq!(record.get_str("y_out"), Some("y#2"));
    assert_eq!(record.get_str("z_out"), Some("z#1"));
    assert!(!record.contains("z_out_history"));
}

/// **Scenario**: A self-loop that never terminates fails after exactly `budget`
/// invocations, for every budget.
#[tokio::test]
async fn never_terminating_cycle_uses_exact_budget() {
    for budget in 1..=12 {
        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = invocations.clone();
        let mut graph = StateGraph::new();
        graph.add_node(
            "spin",
            FnNode::arc(move |_: &Record| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Patch::new().with("spins", n as i64))
            }),
        );
        graph.add_edge(START, "spin");
        graph.add_conditional_edges(
            "spin",
            FnRouter::arc(["AGAIN", "DONE"], |_: &Record| "AGAIN".to_string()),
            [("AGAIN", "spin"), ("DONE", END)],
        );
        let graph = graph.compile().expect("compiles");

        let err = graph
            .invoke_with_budget(Record::new(), budget)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StepBudgetExceeded);
        assert_eq!(invocations.load(Ordering::SeqCst), budget);
        assert_eq!(err.record().get_i64("spins"), Some(budget as i64));
    }
}

/// **Scenario**: A loop that finishes on its last admitted step does not fail.
#[tokio::test]
async fn loop_finishing_within_budget_succeeds() {
    let mut graph = StateGraph::new();
    graph.add_node(
        "count",
        FnNode::arc(|r: &Record| {
            Ok(Patch::new().with("n", r.get_i64("n").unwrap_or(0) + 1))
        }),
    );
    graph.add_edge(START, "count");
    graph.add_conditional_edges(
        "count",
        FnRouter::arc(["AGAIN", "DONE"], |r: &Record| {
            if r.get_i64("n") < Some(3) { "AGAIN" } else { "DONE" }.to_string()
        }),
        [("AGAIN", "count"), ("DONE", END)],
    );
    let graph = graph.compile().expect("compiles");

    let out = graph.invoke_with_budget(Record::new(), 3).await.unwrap();
    assert_eq!(out.get_i64("n"), Some(3));
}
