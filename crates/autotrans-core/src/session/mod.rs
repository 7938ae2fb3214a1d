//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the time-boxed `Session` and its TTL
//! - `dedupe`: `DedupeTracker`, the per-session set of translated message ids

mod dedupe;
mod model;

pub use dedupe::DedupeTracker;
pub use model::{SESSION_TTL, Session, format_remaining};
