//! Shared test nodes: each records its invocations and the record it was given.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stategraph::{
    CompiledStateGraph, FnRouter, MergeRule, Node, NodeError, Patch, Record, StateGraph, END,
    START,
};

/// Invocation log shared by the nodes of one graph.
#[derive(Default)]
pub struct Calls {
    entries: Mutex<Vec<(String, Record)>>,
}

impl Calls {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn order(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn count(&self, id: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == id)
            .count()
    }

    /// Records `id` saw on each of its invocations.
    pub fn inputs(&self, id: &str) -> Vec<Record> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn log(&self, id: &str, record: &Record) -> usize {
        let mut entries = self.entries.lock().unwrap();
        entries.push((id.to_string(), record.clone()));
        entries.iter().filter(|(n, _)| n == id).count()
    }
}

/// Writes each of `fields` as `"<id>#<invocation>"`.
pub struct Writer {
    id: &'static str,
    fields: Vec<&'static str>,
    calls: Arc<Calls>,
}

impl Writer {
    pub fn arc(id: &'static str, fields: &[&'static str], calls: &Arc<Calls>) -> Arc<dyn Node> {
        Arc::new(Self {
            id,
            fields: fields.to_vec(),
            calls: calls.clone(),
        })
    }
}

#[async_trait]
impl Node for Writer {
    async fn run(&self, record: &Record) -> Result<Patch, NodeError> {
        let n = self.calls.log(self.id, record);
        Ok(self
            .fields
            .iter()
            .fold(Patch::new(), |p, f| p.with(*f, format!("{}#{}", self.id, n))))
    }
}

/// Scenario graph: START → {x, y} → z → router (LOOP → START, DONE → END).
///
/// x writes `x_out`, y writes `y_out`, z writes `z_out` and `z_note`, both kept in
/// history. `loop_while` decides LOOP from the record after z.
pub fn scenario_graph(
    calls: &Arc<Calls>,
    loop_while: fn(&Record) -> bool,
) -> CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph.add_node("x", Writer::arc("x", &["x_out"], calls));
    graph.add_node("y", Writer::arc("y", &["y_out"], calls));
    graph.add_node("z", Writer::arc("z", &["z_out", "z_note"], calls));
    graph.add_edge(START, "x");
    graph.add_edge(START, "y");
    graph.add_edge("x", "z");
    graph.add_edge("y", "z");
    graph.add_conditional_edges(
        "z",
        FnRouter::arc(["LOOP", "DONE"], move |r: &Record| {
            if loop_while(r) { "LOOP" } else { "DONE" }.to_string()
        }),
        [("LOOP", START), ("DONE", END)],
    );
    graph.add_merge_rule("z_out", MergeRule::append_to_history("z_out_history"));
    graph.add_merge_rule("z_note", MergeRule::append_to_history("z_note_history"));
    graph.compile().expect("scenario graph compiles")
}
