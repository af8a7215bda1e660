//! Token counting via tiktoken.
//!
//! [`TiktokenCounter`] implements the token-counter port with the
//! cl100k_base encoding, matching the encoding the budget defaults were
//! tuned against.

use formpilot_application::TokenCounterPort;
use tiktoken_rs::CoreBPE;

/// Accurate token counter wrapping tiktoken's cl100k_base tokenizer.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn new() -> Self {
        let bpe = tiktoken_rs::cl100k_base().expect("failed to load cl100k_base tokenizer");
        Self { bpe }
    }
}

impl Default for TiktokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounterPort for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_tokens() {
        let counter = TiktokenCounter::new();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_count_is_deterministic() {
        let counter = TiktokenCounter::new();
        let text = "Section: Budget\nQuestion: What is the total budget?";
        assert_eq!(counter.count(text), counter.count(text));
        assert!(counter.count(text) > 0);
    }

    #[test]
    fn test_longer_text_counts_more() {
        let counter = TiktokenCounter::new();
        let short = counter.count("one question");
        let long = counter.count("one question repeated many times, one question repeated");
        assert!(long > short);
    }
}
