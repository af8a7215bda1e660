//! Prompt domain
//!
//! Templates for the prompts sent at each stage of the form-filling flow.

mod template;

pub use template::FormPromptTemplate;
