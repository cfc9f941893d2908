//! State graph: nodes + static and conditional edges.
//!
//! Add nodes with `add_node`, connect them with `add_edge(from, to)` using `START` and
//! `END` for graph entry/exit, attach routers with `add_conditional_edges`, declare
//! per-field merge rules, then `compile` to get a `CompiledStateGraph`.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::graph::compiled::CompiledStateGraph;
use crate::graph::config::JoinPolicy;
use crate::graph::merge::{MergePolicy, MergeRule};
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::graph::router::{Branch, Next, Router};
use crate::graph::validation_error::ValidationError;

/// Sentinel for graph entry: use as `from` in `add_edge(START, first_node_id)`, or as a
/// label target to re-enter the graph.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to` in `add_edge(last_node_id, END)` and as the
/// terminal label target of conditional edges.
pub const END: &str = "__end__";

struct ConditionalEdges {
    from: String,
    router: Arc<dyn Router>,
    table: Vec<(String, String)>,
}

/// State graph builder.
///
/// Nodes with several static outgoing edges fan out (their successors run
/// concurrently); nodes with several static incoming edges are joins and wait for
/// every predecessor. Conditional edges pick one successor at run time.
///
/// **Interaction**: Accepts `Arc<dyn Node>` and `Arc<dyn Router>`; produces
/// `CompiledStateGraph`. Nothing is checked until `compile`.
pub struct StateGraph {
    nodes: HashMap<String, Arc<dyn Node>>,
    /// Registration order, for deterministic validation.
    node_order: Vec<String>,
    duplicates: Vec<String>,
    edges: Vec<(String, String)>,
    conditionals: Vec<ConditionalEdges>,
    merge_rules: Vec<(String, MergeRule)>,
    join_policy: JoinPolicy,
    middleware: Option<Arc<dyn NodeMiddleware>>,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            duplicates: Vec::new(),
            edges: Vec::new(),
            conditionals: Vec::new(),
            merge_rules: Vec::new(),
            join_policy: JoinPolicy::default(),
            middleware: None,
        }
    }

    /// Sets what happens when a run ends with a half-filled join barrier.
    pub fn with_join_policy(self, join_policy: JoinPolicy) -> Self {
        Self {
            join_policy,
            ..self
        }
    }

    /// Attaches node middleware; the compiled graph wraps every node call with it.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Adds a node. Ids must be unique; a duplicate is reported by `compile`.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            self.duplicates.push(id);
            return self;
        }
        self.node_order.push(id.clone());
        self.nodes.insert(id, node);
        self
    }

    /// Adds a static edge from `from` to `to`.
    ///
    /// Use `START` for graph entry and `END` for graph exit. Several edges out of one
    /// node fan out; several edges into one node make it a join.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Attaches a router to `from`: after `from` runs, the router's label is looked up
    /// in `table` (label → node id, `START` or `END`).
    ///
    /// The table must map every label in `router.labels()` and must contain a route to `END`.
    pub fn add_conditional_edges<I, L, T>(
        &mut self,
        from: impl Into<String>,
        router: Arc<dyn Router>,
        table: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        self.conditionals.push(ConditionalEdges {
            from: from.into(),
            router,
            table: table
                .into_iter()
                .map(|(l, t)| (l.into(), t.into()))
                .collect(),
        });
        self
    }

    /// Declares the merge rule for `field`. Undeclared fields are overwritten.
    pub fn add_merge_rule(&mut self, field: impl Into<String>, rule: MergeRule) -> &mut Self {
        self.merge_rules.push((field.into(), rule));
        self
    }

    /// Validates the graph and builds the executable form.
    ///
    /// Returns `ValidationError` on the first defect found. On success, the graph is
    /// immutable and can be shared across concurrent `invoke` calls.
    pub fn compile(self) -> Result<CompiledStateGraph, ValidationError> {
        if let Some(id) = self.duplicates.first() {
            return Err(ValidationError::DuplicateNode(id.clone()));
        }
        if let Some(id) = self.node_order.iter().find(|id| *id == START || *id == END) {
            return Err(ValidationError::ReservedNodeId(id.clone()));
        }

        let mut merge = MergePolicy::new();
        for (field, rule) in &self.merge_rules {
            merge.declare(field.clone(), rule.clone())?;
        }
        merge.validate()?;

        let successors = self.static_successors()?;
        let branches = self.branches()?;

        for from in branches.keys() {
            if successors.contains_key(from) {
                return Err(ValidationError::MixedEdges(from.clone()));
            }
        }
        if !successors.contains_key(START) {
            return Err(ValidationError::MissingEntry);
        }
        for id in &self.node_order {
            if !successors.contains_key(id) && !branches.contains_key(id) {
                return Err(ValidationError::DeadEnd(id.clone()));
            }
        }

        let reachable = reachable_from_start(&successors, &branches);
        if let Some(id) = self.node_order.iter().find(|id| !reachable.contains(*id)) {
            return Err(ValidationError::Unreachable(id.clone()));
        }

        let mut predecessors: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (from, tos) in &successors {
            for to in tos.iter().filter(|to| *to != END) {
                predecessors
                    .entry(to.clone())
                    .or_default()
                    .insert(from.clone());
            }
        }
        let joins = predecessors
            .into_iter()
            .filter(|(_, preds)| preds.len() >= 2)
            .collect();

        Ok(CompiledStateGraph {
            nodes: Arc::new(self.nodes),
            successors: Arc::new(successors),
            branches: Arc::new(branches),
            joins: Arc::new(joins),
            merge: Arc::new(merge),
            join_policy: self.join_policy,
            middleware: self.middleware,
        })
    }

    /// Static successor lists in declaration order, keyed by source (including `START`).
    fn static_successors(&self) -> Result<HashMap<String, Vec<String>>, ValidationError> {
        let mut successors: HashMap<String, Vec<String>> = HashMap::new();
        let mut seen = HashSet::new();
        for (from, to) in &self.edges {
            let invalid = |reason: &str| ValidationError::InvalidEdge {
                from: from.clone(),
                to: to.clone(),
                reason: reason.into(),
            };
            if to == START {
                return Err(invalid("START cannot be an edge target"));
            }
            if from == END {
                return Err(invalid("END cannot be an edge source"));
            }
            if from != START && !self.nodes.contains_key(from) {
                return Err(ValidationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(ValidationError::NodeNotFound(to.clone()));
            }
            if !seen.insert((from, to)) {
                return Err(invalid("declared twice"));
            }
            successors.entry(from.clone()).or_default().push(to.clone());
        }
        Ok(successors)
    }

    fn branches(&self) -> Result<HashMap<String, Branch>, ValidationError> {
        let mut branches = HashMap::new();
        for cond in &self.conditionals {
            if !self.nodes.contains_key(&cond.from) {
                return Err(ValidationError::NodeNotFound(cond.from.clone()));
            }
            if branches.contains_key(&cond.from) {
                return Err(ValidationError::DuplicateConditional(cond.from.clone()));
            }
            let mut table = HashMap::new();
            for (label, target) in &cond.table {
                let next = match target.as_str() {
                    END => Next::End,
                    START => Next::Start,
                    id if self.nodes.contains_key(id) => Next::Node(id.to_string()),
                    id => return Err(ValidationError::NodeNotFound(id.to_string())),
                };
                table.insert(label.clone(), next);
            }
            if !table.values().any(|next| *next == Next::End) {
                return Err(ValidationError::MissingTerminal {
                    node: cond.from.clone(),
                });
            }
            for label in cond.router.labels() {
                if !table.contains_key(&label) {
                    return Err(ValidationError::UnmappedLabel {
                        node: cond.from.clone(),
                        label,
                    });
                }
            }
            branches.insert(
                cond.from.clone(),
                Branch {
                    router: cond.router.clone(),
                    table,
                },
            );
        }
        Ok(branches)
    }
}

/// Node ids reachable from `START` through static edges and label-table targets.
fn reachable_from_start(
    successors: &HashMap<String, Vec<String>>,
    branches: &HashMap<String, Branch>,
) -> HashSet<String> {
    let mut reachable = HashSet::new();
    let mut queue: VecDeque<&str> = successors
        .get(START)
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    while let Some(id) = queue.pop_front() {
        if id == END || !reachable.insert(id.to_string()) {
            continue;
        }
        if let Some(tos) = successors.get(id) {
            queue.extend(tos.iter().map(String::as_str));
        }
        if let Some(branch) = branches.get(id) {
            for next in branch.table.values() {
                if let Next::Node(to) = next {
                    queue.push_back(to);
                }
            }
        }
    }
    reachable
}
