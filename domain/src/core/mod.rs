//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`] — a single form question with its section
//! - [`question::QuestionSet`] — the ordered question list for one form
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod question;
