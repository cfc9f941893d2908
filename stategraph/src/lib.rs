//! # stategraph
//!
//! A small, LangGraph-style execution engine for stateful node graphs. One shared
//! [`Record`] flows through the run: nodes read an immutable snapshot and return a
//! [`Patch`], and the engine merges patches back field by field.
//!
//! ## Design Principles
//!
//! - **Record in, patches out**: nodes never mutate shared state. Nodes that are ready
//!   at the same time run concurrently against the same snapshot.
//! - **Explicit merge rules**: each field is overwritten, appended to a history field
//!   on overwrite, or written only once ([`MergeRule`]). Two concurrent writers of an
//!   overwrite field are a [`InvokeError::MergeConflict`], never a race.
//! - **Explicit joins**: a node with several static incoming edges runs only after
//!   every predecessor completed in the current pass.
//! - **Bounded cycles**: conditional edges may route back to earlier nodes; every run is
//!   bounded by a step budget ([`DEFAULT_STEP_BUDGET`]).
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Router`, `MergeRule`.
//! - [`record`]: `Record` / `Patch`.
//! - [`stream`]: `StreamMode`, `StreamEvent` for `CompiledStateGraph::stream`.
//! - [`error`]: `NodeError`, `InvokeError`.
//!
//! ## Quick Start
//!
//! ```rust
//! use stategraph::{FnNode, FnRouter, MergeRule, Patch, Record, StateGraph, END, START};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut graph = StateGraph::new();
//! graph.add_node("draft", FnNode::arc(|r: &Record| {
//!     let round = r.get_i64("round").unwrap_or(0) + 1;
//!     Ok(Patch::new().with("round", round).with("plan", format!("plan v{}", round)))
//! }));
//! graph.add_edge(START, "draft");
//! graph.add_conditional_edges(
//!     "draft",
//!     FnRouter::arc(["AGAIN", "DONE"], |r: &Record| {
//!         if r.get_i64("round") < Some(2) { "AGAIN".into() } else { "DONE".into() }
//!     }),
//!     [("AGAIN", "draft"), ("DONE", END)],
//! );
//! graph.add_merge_rule("plan", MergeRule::append_to_history("plan_history"));
//!
//! let graph = graph.compile().unwrap();
//! let out = graph.invoke(Record::new(), None).await.unwrap();
//! assert_eq!(out.get_str("plan"), Some("plan v2"));
//! assert_eq!(out.get("plan_history"), Some(&serde_json::json!(["plan v1"])));
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod record;
pub mod stream;

pub use error::{ErrorKind, InvokeError, NodeError};
pub use graph::{
    CompiledStateGraph, FnNode, FnRouter, InvokeConfig, JoinPolicy, MergePolicy, MergeRule,
    Next, Node, NodeCall, NodeMiddleware, Router, StateGraph, ValidationError,
    DEFAULT_STEP_BUDGET, END, START,
};
pub use record::{Patch, Record};
pub use stream::{StreamEvent, StreamMode};
