//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Execution proceeds in steps: every node in the
//! frontier runs concurrently against one snapshot of the record, the patches are
//! checked for collisions and merged in frontier order, then the frontier advances
//! along static edges (through the join barriers) and conditional edges (through the
//! routers). The run ends when the frontier is empty.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::error::{InvokeError, NodeError};
use crate::record::{Patch, Record};
use crate::stream::{StreamEvent, StreamMode};

use super::config::{InvokeConfig, JoinPolicy};
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_join_wait, log_node_complete,
    log_node_start, log_route,
};
use super::merge::{MergeError, MergePolicy};
use super::node::Node;
use super::node_middleware::NodeMiddleware;
use super::router::{Branch, Next};
use super::run_context::RunContext;
use super::state_graph::{END, START};
use super::step_governor::StepGovernor;
use super::synchronizer::Synchronizer;

/// Compiled graph: immutable structure, cheap to clone, shareable across tasks.
///
/// Created by `StateGraph::compile()`. Each `invoke` gets its own record, step
/// governor and join-wait state; nothing is shared between calls.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(crate) nodes: Arc<HashMap<String, Arc<dyn Node>>>,
    /// Static successors in declaration order, keyed by source (including `START`).
    pub(crate) successors: Arc<HashMap<String, Vec<String>>>,
    pub(crate) branches: Arc<HashMap<String, Branch>>,
    /// Join node → required predecessors (sources of its static incoming edges).
    pub(crate) joins: Arc<HashMap<String, BTreeSet<String>>>,
    pub(crate) merge: Arc<MergePolicy>,
    pub(crate) join_policy: JoinPolicy,
    pub(crate) middleware: Option<Arc<dyn NodeMiddleware>>,
}

impl CompiledStateGraph {
    /// Runs the graph from `START` with `record` as the initial state and returns the
    /// final record.
    ///
    /// `None` for config uses `InvokeConfig::default()` (step budget
    /// [`DEFAULT_STEP_BUDGET`](crate::DEFAULT_STEP_BUDGET)). On failure the error carries
    /// the partial record.
    pub async fn invoke(
        &self,
        record: Record,
        config: Option<InvokeConfig>,
    ) -> Result<Record, InvokeError> {
        let config = config.unwrap_or_default();
        let span = tracing::info_span!("run", run_id = config.run_id.as_deref().unwrap_or("-"));
        let mut ctx = self.run_context(record, &config, None, HashSet::new());

        match self.run_loop(&mut ctx).instrument(span).await {
            Ok(()) => Ok(ctx.record),
            Err(e) => {
                log_graph_error(&e);
                Err(e)
            }
        }
    }

    /// Same as `invoke` with only the step budget overridden.
    pub async fn invoke_with_budget(
        &self,
        record: Record,
        step_budget: usize,
    ) -> Result<Record, InvokeError> {
        self.invoke(record, Some(InvokeConfig::with_step_budget(step_budget)))
            .await
    }

    /// Streams graph execution, emitting events via a channel-backed stream.
    ///
    /// The run happens on a spawned task; a failure is delivered as the last event,
    /// `StreamEvent::Error`.
    pub fn stream(
        &self,
        record: Record,
        config: Option<InvokeConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let mode_set: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let config = config.unwrap_or_default();
            let mut ctx = graph.run_context(record, &config, Some(tx.clone()), mode_set);
            if let Err(e) = graph.run_loop(&mut ctx).await {
                log_graph_error(&e);
                let _ = tx.send(StreamEvent::Error(e)).await;
            }
        });

        ReceiverStream::new(rx)
    }

    /// Required predecessors of `node_id` if it is a join.
    pub fn join_predecessors(&self, node_id: &str) -> Option<Vec<&str>> {
        self.joins
            .get(node_id)
            .map(|preds| preds.iter().map(String::as_str).collect())
    }

    fn run_context(
        &self,
        record: Record,
        config: &InvokeConfig,
        stream_tx: Option<mpsc::Sender<StreamEvent>>,
        stream_mode: HashSet<StreamMode>,
    ) -> RunContext<'_> {
        RunContext {
            record,
            governor: StepGovernor::new(config.step_budget),
            sync: Synchronizer::new(&self.joins),
            stream_tx,
            stream_mode,
        }
    }

    /// Shared run loop used by invoke() and stream(): steps until the frontier is empty.
    async fn run_loop(&self, ctx: &mut RunContext<'_>) -> Result<(), InvokeError> {
        log_graph_start(ctx.governor.budget());

        let mut frontier = Vec::new();
        self.enter(ctx, &mut frontier);

        while !frontier.is_empty() {
            let first_step = ctx.governor.used() + 1;
            let admitted = ctx.governor.admit(frontier.len());
            let batch = &frontier[..admitted];

            if !batch.is_empty() {
                let patches = self
                    .run_batch(batch, &ctx.record, first_step)
                    .await
                    .map_err(|(node_id, cause)| InvokeError::NodeFailure {
                        node_id,
                        cause,
                        record: ctx.record.clone(),
                    })?;

                self.merge
                    .check_disjoint(&patches)
                    .map_err(|e| merge_error(e, &ctx.record))?;
                // Merge into a copy; the record only moves once the whole batch merged.
                let mut merged = ctx.record.clone();
                let mut staged = Vec::with_capacity(patches.len());
                for (node_id, patch) in patches {
                    self.merge
                        .apply(&mut merged, &node_id, patch.clone())
                        .map_err(|e| merge_error(e, &ctx.record))?;
                    let values = ctx.streams_values().then(|| merged.clone());
                    staged.push((node_id, patch, values));
                }
                for (node_id, patch, values) in staged {
                    ctx.emit_update(&node_id, &patch).await;
                    if let Some(values) = values {
                        ctx.emit_values(&values).await;
                    }
                }
                ctx.record = merged;
            }

            if admitted < frontier.len() {
                return Err(InvokeError::StepBudgetExceeded {
                    budget: ctx.governor.budget(),
                    record: ctx.record.clone(),
                });
            }

            let mut next = Vec::new();
            for node_id in &frontier {
                self.advance(node_id, ctx, &mut next)?;
            }
            frontier = next;
        }

        if self.join_policy == JoinPolicy::Strict {
            if let Some((node_id, missing)) = ctx.sync.pending().into_iter().next() {
                return Err(InvokeError::IncompleteJoin {
                    node_id,
                    missing,
                    record: ctx.record.clone(),
                });
            }
        }

        log_graph_complete(ctx.governor.used());
        Ok(())
    }

    /// Runs one step's nodes concurrently against the same snapshot. Patches come back
    /// in frontier order; the first failure cancels the rest of the batch.
    async fn run_batch(
        &self,
        batch: &[String],
        snapshot: &Record,
        first_step: usize,
    ) -> Result<Vec<(String, Patch)>, (String, NodeError)> {
        let calls = batch.iter().enumerate().map(|(i, node_id)| async move {
            self.call_node(node_id, snapshot, first_step + i)
                .await
                .map(|patch| (node_id.clone(), patch))
                .map_err(|cause| (node_id.clone(), cause))
        });
        try_join_all(calls).await
    }

    async fn call_node(
        &self,
        node_id: &str,
        snapshot: &Record,
        step: usize,
    ) -> Result<Patch, NodeError> {
        let Some(node) = self.nodes.get(node_id) else {
            return Err(NodeError::Failed(format!("node `{}` is not registered", node_id)));
        };
        log_node_start(node_id, step);

        let result = match &self.middleware {
            Some(middleware) => {
                middleware
                    .around_run(node_id, snapshot, node.run(snapshot))
                    .await
            }
            None => node.run(snapshot).await,
        };

        if let Ok(patch) = &result {
            log_node_complete(node_id, patch.len());
        }
        result
    }

    /// Activates `START`'s static successors.
    fn enter(&self, ctx: &mut RunContext<'_>, next: &mut Vec<String>) {
        for to in self.successors.get(START).into_iter().flatten() {
            activate(START, to, ctx, next);
        }
    }

    /// Moves past a completed node: follow its router if it has one, otherwise its
    /// static edges.
    fn advance(
        &self,
        node_id: &str,
        ctx: &mut RunContext<'_>,
        next: &mut Vec<String>,
    ) -> Result<(), InvokeError> {
        if let Some(branch) = self.branches.get(node_id) {
            let (label, target) =
                branch
                    .resolve(&ctx.record)
                    .map_err(|label| InvokeError::UnroutableLabel {
                        node_id: node_id.to_string(),
                        label,
                        record: ctx.record.clone(),
                    })?;
            log_route(node_id, &label);
            match target {
                Next::End => {}
                Next::Start => self.enter(ctx, next),
                // A routed activation does not wait on a join barrier.
                Next::Node(to) => push_unique(next, to),
            }
            return Ok(());
        }

        for to in self.successors.get(node_id).into_iter().flatten() {
            activate(node_id, to, ctx, next);
        }
        Ok(())
    }
}

/// Follows one static edge `from → to`, holding `to` back if it is a join whose
/// barrier has not cleared.
fn activate(from: &str, to: &str, ctx: &mut RunContext<'_>, next: &mut Vec<String>) {
    if to == END {
        return;
    }
    if !ctx.sync.arrive(to, from) {
        log_join_wait(to, from);
        return;
    }
    push_unique(next, to);
}

fn push_unique(next: &mut Vec<String>, id: &str) {
    if !next.iter().any(|n| n == id) {
        next.push(id.to_string());
    }
}

fn merge_error(e: MergeError, record: &Record) -> InvokeError {
    match e {
        MergeError::Conflict { field, node_id } => InvokeError::MergeConflict {
            field,
            node_id,
            record: record.clone(),
        },
        MergeError::InvalidHistory { field, node_id } => InvokeError::InvalidHistory {
            field,
            node_id,
            record: record.clone(),
        },
    }
}
