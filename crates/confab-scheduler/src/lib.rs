//! confab-scheduler - Deferred delivery of staggered agent replies
//!
//! This crate provides:
//! - `ReplyRunner`, which schedules each synthesized reply as an independent
//!   tokio task firing after an increasing offset
//! - Per-reply cancellation tokens plus a global shutdown token
//! - The `ReplySink` trait through which delivered replies reach the
//!   conversation state and front-end

pub mod runner;

pub use runner::{ReplyConfig, ReplyRunner, ReplySink, ScheduledReply};
