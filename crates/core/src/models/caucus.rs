//! Caucus model - a debate sub-session with its own queue and timers

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{TimerData, Unit, DEFAULT_CAUCUS_TIME_SECONDS, DEFAULT_SPEAKER_TIME_SECONDS};

/// Identifier of a committee, assigned by the hosting layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitteeId(pub String);

impl CommitteeId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitteeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a caucus within a committee
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaucusId(pub String);

impl CaucusId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a short random identifier for a new caucus
    pub fn generate() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(8)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaucusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caucus lifecycle status; `Closed` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaucusStatus {
    Open,
    Closed,
}

/// Position a speaker takes on the topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    For,
    Neutral,
    Against,
}

/// A single entry in the queue, the speaking slot, or the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerEvent {
    pub who: String,
    pub stance: Stance,
    /// Seconds. While queued or speaking this is the allotted speaking
    /// time; once the event moves to history it is the time actually
    /// spoken. The lifecycle transition overwrites it on retirement.
    pub duration: u32,
}

impl SpeakerEvent {
    pub fn new(who: String, stance: Stance, duration: u32) -> Self {
        Self {
            who,
            stance,
            duration,
        }
    }
}

/// A debate sub-session with a speaker queue, per-speaker timers, and an
/// append-only history of who spoke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaucusData {
    pub name: String,
    pub topic: String,
    pub status: CaucusStatus,
    pub speaker_timer: TimerData,
    pub caucus_timer: TimerData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_unit: Option<Unit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_is_public: Option<bool>,
    /// Who is speaking right now; empty means nobody
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaking: Option<SpeakerEvent>,
    /// Scheduled speakers keyed by push key; the head is the smallest key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub queue: BTreeMap<String, SpeakerEvent>,
    /// Past speakers, append-only
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub history: BTreeMap<String, SpeakerEvent>,
}

impl CaucusData {
    pub fn new(name: String, topic: String) -> Self {
        Self {
            name,
            topic,
            ..Self::default()
        }
    }
}

impl Default for CaucusData {
    fn default() -> Self {
        Self {
            name: "untitled caucus".to_string(),
            topic: String::new(),
            status: CaucusStatus::Open,
            speaker_timer: TimerData::loaded(DEFAULT_SPEAKER_TIME_SECONDS),
            caucus_timer: TimerData::loaded(DEFAULT_CAUCUS_TIME_SECONDS),
            speaker_duration: Some(DEFAULT_SPEAKER_TIME_SECONDS),
            speaker_unit: Some(Unit::Seconds),
            queue_is_public: Some(false),
            speaking: None,
            queue: BTreeMap::new(),
            history: BTreeMap::new(),
        }
    }
}

/// Per-speaker time unit for a caucus, defaulting to seconds when unset
pub fn recover_unit(caucus: Option<&CaucusData>) -> Unit {
    caucus.and_then(|c| c.speaker_unit).unwrap_or(Unit::Seconds)
}

/// Configured per-speaker duration for a caucus; zero counts as unset
pub fn recover_duration(caucus: Option<&CaucusData>) -> Option<u32> {
    caucus.and_then(|c| c.speaker_duration).filter(|&d| d != 0)
}
