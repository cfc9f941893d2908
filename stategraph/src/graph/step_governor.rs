//! Step governor: bounds the number of node invocations in one run.
//!
//! This is the only guard against a conditional cycle whose predicate never reaches
//! the terminal label.

/// Budget used when the caller does not set `InvokeConfig::step_budget`.
pub const DEFAULT_STEP_BUDGET: usize = 25;

#[derive(Debug, Clone)]
pub(crate) struct StepGovernor {
    budget: usize,
    used: usize,
}

impl StepGovernor {
    pub(crate) fn new(budget: usize) -> Self {
        Self { budget, used: 0 }
    }

    /// Admits up to `requested` invocations and returns how many may run. Fewer than
    /// `requested` means the budget is exhausted after the admitted ones.
    pub(crate) fn admit(&mut self, requested: usize) -> usize {
        let admitted = requested.min(self.budget - self.used);
        self.used += admitted;
        admitted
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn budget(&self) -> usize {
        self.budget
    }
}
