//! Pipeline tuning parameters.
//!
//! [`FillParams`] groups the static knobs that control the form-fill
//! pipeline: worker-pool widths, retry counts, retrieval depth, the
//! split-search bound, and the token budget. These are application-layer
//! concerns, not domain policy.

use formpilot_domain::TokenBudget;
use serde::{Deserialize, Serialize};

/// Form-fill pipeline parameters.
///
/// The retrieval pool is wide (default 15 workers, tuned to stay under
/// the backend's ~20 requests/second ceiling); the generation pool is
/// deliberately narrow (default 3) because large-context calls carry
/// stricter per-minute limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillParams {
    /// Concurrent retrieval workers.
    pub max_retrieval_workers: usize,
    /// Concurrent generation workers during a split.
    pub max_generation_workers: usize,
    /// Retrieval attempts per question before giving up.
    pub max_retries: usize,
    /// Context chunks requested per retrieval query.
    pub results_per_query: usize,
    /// Largest split count the adaptive search will try.
    pub max_split: usize,
    /// Token caps for generation calls.
    pub token_budget: TokenBudget,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            max_retrieval_workers: 15,
            max_generation_workers: 3,
            max_retries: 3,
            results_per_query: 20,
            max_split: 4,
            token_budget: TokenBudget::default(),
        }
    }
}

impl FillParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retrieval_workers(mut self, workers: usize) -> Self {
        self.max_retrieval_workers = workers;
        self
    }

    pub fn with_max_generation_workers(mut self, workers: usize) -> Self {
        self.max_generation_workers = workers;
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_results_per_query(mut self, results: usize) -> Self {
        self.results_per_query = results;
        self
    }

    pub fn with_max_split(mut self, max_split: usize) -> Self {
        self.max_split = max_split;
        self
    }

    pub fn with_token_budget(mut self, budget: TokenBudget) -> Self {
        self.token_budget = budget;
        self
    }

    // ==================== Validation ====================

    /// Validate these parameters, returning a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_retrieval_workers == 0 {
            issues.push("pipeline: max_retrieval_workers must be >= 1".to_string());
        }
        if self.max_generation_workers == 0 {
            issues.push("pipeline: max_generation_workers must be >= 1".to_string());
        }
        if self.max_retries == 0 {
            issues.push("pipeline: max_retries must be >= 1".to_string());
        }
        if self.results_per_query == 0 {
            issues.push("pipeline: results_per_query must be >= 1".to_string());
        }
        if self.max_split < 2 {
            issues.push(format!(
                "pipeline: max_split ({}) must be >= 2",
                self.max_split
            ));
        }
        issues.extend(self.token_budget.validate());
        issues
    }
}
