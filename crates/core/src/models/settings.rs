//! Committee settings model

use serde::{Deserialize, Serialize};

/// Per-committee feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsData {
    /// Newly queued speakers go above the current position
    pub move_queue_up: bool,
    pub timers_in_separate_columns: bool,
    /// Advance to the next speaker when the timer runs out
    pub auto_next_speaker: bool,
    /// Stop the caucus timer in lockstep with the speaker timer
    pub auto_caucus_timer: bool,
    #[serde(default)]
    pub motion_votes: bool,
    #[serde(default)]
    pub motions_are_public: bool,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            move_queue_up: false,
            timers_in_separate_columns: false,
            auto_next_speaker: false,
            auto_caucus_timer: true,
            motion_votes: false,
            motions_are_public: false,
        }
    }
}
