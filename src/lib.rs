//! Day Prep: meeting brief engine for sales reps.

pub mod briefing;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod prep;
pub mod storage;
