//! Extension trait for fluent API: attach node logging middleware then compile.
//!
//! Interacts with [`StateGraph`](stategraph::StateGraph) and
//! [`LoggingMiddleware`](super::logging::LoggingMiddleware).

use std::sync::Arc;

use stategraph::StateGraph;

use super::logging::LoggingMiddleware;

/// Extension trait for fluent API: attach node logging middleware then compile.
pub trait WithNodeLogging {
    /// Returns the same graph with `LoggingMiddleware` attached. Chain with `.compile()?`.
    fn with_node_logging(self) -> Self;
}

impl WithNodeLogging for StateGraph {
    fn with_node_logging(self) -> Self {
        self.with_middleware(Arc::new(LoggingMiddleware))
    }
}
