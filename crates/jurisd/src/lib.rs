//! Juris Daemon - case intake, matching, and lifecycle service
//!
//! HTTP binding of the case intake and matching core: classification and
//! urgency scoring on submission, advocate ranking on demand, and the case
//! lifecycle state machine with optimistic-concurrency guards.

pub mod config;
pub mod ledger;
pub mod lifecycle;
pub mod notifier;
pub mod routes;
pub mod server;
pub mod store;
