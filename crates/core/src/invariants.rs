//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{CaucusData, CaucusStatus};
use crate::store::{StorePath, WriteOp};

/// Validate that a caucus record is internally consistent
pub fn assert_caucus_invariants(caucus: &CaucusData) {
    debug_assert!(
        !caucus.name.trim().is_empty(),
        "caucus has empty name (topic: {:?})",
        caucus.topic
    );

    debug_assert!(
        caucus.status != CaucusStatus::Closed
            || (!caucus.speaker_timer.ticking && !caucus.caucus_timer.ticking),
        "closed caucus {:?} has a ticking timer",
        caucus.name
    );
}

/// Validate that a planned lifecycle batch stays inside its caucus subtree
pub fn assert_lifecycle_ops_scoped(ops: &[WriteOp], caucus_path: &StorePath) {
    for op in ops {
        debug_assert!(
            op.path().starts_with(caucus_path),
            "lifecycle write at {} escapes caucus {}",
            op.path(),
            caucus_path
        );
    }
}
