//! Fetch orchestration
//!
//! Sequences the two paginated fetches (vulnerabilities, then assets),
//! persists each one and stops early when a collection comes back empty.
//!
//! # Overview
//!
//! - `FetchOrchestrator` - runs the collections in order
//! - `RunOutcome` - `Completed` with both collections, or `HaltedEmpty`
//!   naming the collection that had no records

mod orchestrator;

pub use orchestrator::{FetchOrchestrator, FetchedCollection, RunOutcome};
