//! State graph: nodes, static and conditional edges, merge rules; compile and invoke.
//!
//! Build a [`StateGraph`], `compile` it into an immutable [`CompiledStateGraph`], then
//! `invoke` it with an initial [`Record`](crate::Record) as many times as needed.

mod compiled;
mod config;
pub mod logging;
mod merge;
mod node;
mod node_middleware;
mod router;
mod run_context;
mod state_graph;
mod step_governor;
mod synchronizer;
mod validation_error;

pub use compiled::CompiledStateGraph;
pub use config::{InvokeConfig, JoinPolicy};
pub use merge::{MergePolicy, MergeRule};
pub use node::{FnNode, Node};
pub use node_middleware::{NodeCall, NodeMiddleware};
pub use router::{FnRouter, Next, Router};
pub use state_graph::{StateGraph, END, START};
pub use step_governor::DEFAULT_STEP_BUDGET;
pub use validation_error::ValidationError;
