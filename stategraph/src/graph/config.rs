//! Invoke config and join policy.
//!
//! [`InvokeConfig`] is passed per call to `CompiledStateGraph::invoke`; [`JoinPolicy`]
//! is fixed on the graph at build time.

use super::step_governor::DEFAULT_STEP_BUDGET;

/// Config for a single invoke.
///
/// **Interaction**: Passed to `CompiledStateGraph::invoke(record, config)` and
/// `stream`. `None` there means `InvokeConfig::default()`.
#[derive(Debug, Clone)]
pub struct InvokeConfig {
    /// Maximum node invocations for this run. Defaults to [`DEFAULT_STEP_BUDGET`].
    pub step_budget: usize,
    /// Optional caller-side id, attached to the run's tracing span.
    pub run_id: Option<String>,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            step_budget: DEFAULT_STEP_BUDGET,
            run_id: None,
        }
    }
}

impl InvokeConfig {
    pub fn with_step_budget(step_budget: usize) -> Self {
        Self {
            step_budget,
            ..Self::default()
        }
    }
}

/// What happens when a run terminates while a join barrier is only partially filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinPolicy {
    /// The join silently never runs.
    #[default]
    Lenient,
    /// The run fails with `InvokeError::IncompleteJoin`.
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Default config uses the default step budget and no run id.
    #[test]
    fn invoke_config_default() {
        let c = InvokeConfig::default();
        assert_eq!(c.step_budget, DEFAULT_STEP_BUDGET);
        assert!(c.run_id.is_none());
        assert_eq!(InvokeConfig::with_step_budget(7).step_budget, 7);
        assert_eq!(JoinPolicy::default(), JoinPolicy::Lenient);
    }
}
