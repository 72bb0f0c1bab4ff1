//! Timer state shared by the speaker and caucus timers

use serde::{Deserialize, Serialize};

/// Time loaded into a fresh speaker timer, in seconds
pub const DEFAULT_SPEAKER_TIME_SECONDS: u32 = 60;

/// Time loaded into a fresh caucus timer, in seconds
pub const DEFAULT_CAUCUS_TIME_SECONDS: u32 = 600;

/// Unit used when entering per-speaker time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "min")]
    Minutes,
    #[serde(rename = "sec")]
    Seconds,
}

impl Unit {
    pub fn display_name(&self) -> &'static str {
        match self {
            Unit::Minutes => "Minutes",
            Unit::Seconds => "Seconds",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Countdown timer snapshot
///
/// `remaining` cannot go below zero; the unsigned type carries the
/// contract the UI relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerData {
    pub elapsed: u32,
    pub remaining: u32,
    pub ticking: bool,
}

impl TimerData {
    /// A stopped timer loaded with `seconds` and nothing elapsed
    pub fn loaded(seconds: u32) -> Self {
        Self {
            elapsed: 0,
            remaining: seconds,
            ticking: false,
        }
    }

    /// The same timer values with ticking forced off
    pub fn stopped(&self) -> Self {
        Self {
            ticking: false,
            ..*self
        }
    }
}

impl Default for TimerData {
    fn default() -> Self {
        Self::loaded(DEFAULT_SPEAKER_TIME_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_timer() {
        let timer = TimerData::loaded(120);
        assert_eq!(timer.elapsed, 0);
        assert_eq!(timer.remaining, 120);
        assert!(!timer.ticking);
    }

    #[test]
    fn test_stopped_keeps_values() {
        let timer = TimerData {
            elapsed: 40,
            remaining: 20,
            ticking: true,
        };
        let stopped = timer.stopped();
        assert_eq!(stopped.elapsed, 40);
        assert_eq!(stopped.remaining, 20);
        assert!(!stopped.ticking);
    }

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(serde_json::to_string(&Unit::Seconds).unwrap(), "\"sec\"");
        assert_eq!(serde_json::to_string(&Unit::Minutes).unwrap(), "\"min\"");
        assert_eq!(Unit::Seconds.to_string(), "Seconds");
    }
}
