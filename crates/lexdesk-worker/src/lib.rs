//! Scheduled background tasks for LexDesk.
//!
//! This crate provides:
//! - A cron scheduler that drives periodic maintenance
//! - The expired-session sweep job

pub mod jobs;
pub mod scheduler;

pub use jobs::SessionSweepJob;
pub use scheduler::CronScheduler;
