//! Prep actions: preview generation, profile lookup, calendar probe.

pub mod prompts;
mod service;

pub use service::{PrepService, PreviewReport, previous_companies};
