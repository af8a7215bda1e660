//! Token budget for generation calls.
//!
//! [`TokenBudget`] caps how large a single generation request may be and
//! how much output it may produce. The input cap is advisory: the
//! generation backend's own rejection of an oversized request remains
//! the authoritative signal, the budget just decides whether a
//! single-call attempt is worth making at all.

use serde::{Deserialize, Serialize};

/// Token caps for one generation call.
///
/// Three knobs:
/// - `max_input_tokens`: practical input ceiling for a single call
/// - `max_output_tokens`: output cap for a full-form call (and the
///   final polish pass)
/// - `partial_output_tokens`: reduced output cap for a partial call
///   that answers only one slice of the question set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudget {
    max_input_tokens: usize,
    max_output_tokens: usize,
    partial_output_tokens: usize,
}

impl TokenBudget {
    /// Create a new budget with explicit values.
    pub fn new(
        max_input_tokens: usize,
        max_output_tokens: usize,
        partial_output_tokens: usize,
    ) -> Self {
        Self {
            max_input_tokens,
            max_output_tokens,
            partial_output_tokens,
        }
    }

    // ==================== Accessors ====================

    pub fn max_input_tokens(&self) -> usize {
        self.max_input_tokens
    }

    pub fn max_output_tokens(&self) -> usize {
        self.max_output_tokens
    }

    pub fn partial_output_tokens(&self) -> usize {
        self.partial_output_tokens
    }

    // ==================== Builder Methods ====================

    pub fn with_max_input_tokens(mut self, tokens: usize) -> Self {
        self.max_input_tokens = tokens;
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: usize) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    pub fn with_partial_output_tokens(mut self, tokens: usize) -> Self {
        self.partial_output_tokens = tokens;
        self
    }

    // ==================== Validation ====================

    /// Validate this budget, returning a list of issues.
    ///
    /// Rules:
    /// - all caps must be nonzero
    /// - `partial_output_tokens <= max_output_tokens`
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_input_tokens == 0 {
            issues.push("token_budget: max_input_tokens must be nonzero".to_string());
        }
        if self.max_output_tokens == 0 {
            issues.push("token_budget: max_output_tokens must be nonzero".to_string());
        }
        if self.partial_output_tokens == 0 {
            issues.push("token_budget: partial_output_tokens must be nonzero".to_string());
        }
        if self.partial_output_tokens > self.max_output_tokens {
            issues.push(format!(
                "token_budget: partial_output_tokens ({}) must be <= max_output_tokens ({})",
                self.partial_output_tokens, self.max_output_tokens
            ));
        }
        issues
    }
}

impl Default for TokenBudget {
    /// Default: 150k input ceiling, 63k full output, 20k partial output.
    fn default() -> Self {
        Self {
            max_input_tokens: 150_000,
            max_output_tokens: 63_000,
            partial_output_tokens: 20_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let budget = TokenBudget::default();
        assert_eq!(budget.max_input_tokens(), 150_000);
        assert_eq!(budget.max_output_tokens(), 63_000);
        assert_eq!(budget.partial_output_tokens(), 20_000);
    }

    #[test]
    fn test_builder() {
        let budget = TokenBudget::default()
            .with_max_input_tokens(1_000)
            .with_max_output_tokens(500)
            .with_partial_output_tokens(100);
        assert_eq!(budget.max_input_tokens(), 1_000);
        assert_eq!(budget.max_output_tokens(), 500);
        assert_eq!(budget.partial_output_tokens(), 100);
    }

    #[test]
    fn test_validate_ok() {
        assert!(TokenBudget::default().validate().is_empty());
    }

    #[test]
    fn test_validate_partial_above_full() {
        let budget = TokenBudget::new(1_000, 100, 200);
        let issues = budget.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("partial_output_tokens"));
    }

    #[test]
    fn test_validate_zero_caps() {
        let budget = TokenBudget::new(0, 0, 0);
        assert_eq!(budget.validate().len(), 3);
    }

    #[test]
    fn test_serde_roundtrip() {
        let budget = TokenBudget::new(10_000, 4_000, 1_000);
        let json = serde_json::to_string(&budget).unwrap();
        let back: TokenBudget = serde_json::from_str(&json).unwrap();
        assert_eq!(budget, back);
    }
}
