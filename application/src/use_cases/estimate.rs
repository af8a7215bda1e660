//! Advisory token-budget estimate.
//!
//! Decides up front whether the template text, retrieved corpus, and
//! instructions fit one generation call, so an obviously oversized
//! request goes straight to splitting instead of wasting a full-size
//! call. The generation backend's own rejection stays authoritative.

use crate::ports::token_counter::TokenCounterPort;
use formpilot_domain::TokenBudget;
use std::sync::Arc;

/// Deterministic prompt-size check against the input-token ceiling
pub struct BudgetEstimator {
    counter: Arc<dyn TokenCounterPort>,
    budget: TokenBudget,
}

impl BudgetEstimator {
    pub fn new(counter: Arc<dyn TokenCounterPort>, budget: TokenBudget) -> Self {
        Self { counter, budget }
    }

    /// Token count of the full single-call prompt.
    pub fn estimate(&self, template_text: &str, corpus: &str, instructions: &str) -> usize {
        let combined = format!("{template_text}{corpus}{instructions}");
        self.counter.count(&combined)
    }

    /// Whether an estimate fits the input ceiling.
    pub fn fits_tokens(&self, tokens: usize) -> bool {
        tokens <= self.budget.max_input_tokens()
    }

    /// Whether the combined prompt fits one generation call.
    pub fn fits(&self, template_text: &str, corpus: &str, instructions: &str) -> bool {
        self.fits_tokens(self.estimate(template_text, corpus, instructions))
    }
}
