//! Finding identifier generation.
//!
//! Identifiers are only guaranteed unique within a single response; callers
//! must not rely on them across restarts or processes.

use uuid::Uuid;

/// Generate a fresh finding identifier.
pub fn generate() -> String {
    format!("finding-{}", Uuid::new_v4())
}
