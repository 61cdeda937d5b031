//! Audit logging
//!
//! Records user registrations, recorded transactions, budget changes,
//! category renames and CSV imports in an append-only JSONL log.
//!
//! - `AuditEntry`: one operation on one entity, with optional before/after
//!   values.
//! - `AuditLogger`: appends entries to the log file.
//! - `generate_diff`: human-readable summary of what changed.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
