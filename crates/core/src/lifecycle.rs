//! Speaker lifecycle transition
//!
//! Retires the current speaker into history and promotes the queue head
//! into the speaking slot. The transition is planned as a pure write
//! sequence first, then applied to the store as one atomic batch, so a
//! failure cannot leave the caucus half-advanced.

use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::invariants::assert_lifecycle_ops_scoped;
use crate::models::{CaucusData, CaucusId, CommitteeId, SettingsData, SpeakerEvent, TimerData};
use crate::store::{push_key, KeyValueStore, StorePath, WriteOp};

/// Inputs to one lifecycle transition, snapshotted by the caller
#[derive(Debug, Clone)]
pub struct Lifecycle {
    pub committee: CommitteeId,
    pub caucus: CaucusId,
    /// Who is speaking now, if anyone
    pub speaking: Option<SpeakerEvent>,
    pub speaker_timer: TimerData,
    pub caucus_timer: TimerData,
    /// The next scheduled speaker: queue key and event
    pub queue_head: Option<(String, SpeakerEvent)>,
    /// Leftover speaker time rolls over to the successor
    pub yielding: bool,
    /// Stop the caucus timer in lockstep with the speaker timer
    pub auto_caucus_timer: bool,
    /// Value the speaker timer reloads to when nobody is promoted
    pub timer_reset_seconds: u32,
}

impl Lifecycle {
    /// Snapshot transition inputs from a loaded caucus record
    pub fn from_caucus(
        committee: CommitteeId,
        caucus_id: CaucusId,
        caucus: &CaucusData,
        settings: &SettingsData,
        yielding: bool,
        timer_reset_seconds: u32,
    ) -> Self {
        Self {
            committee,
            caucus: caucus_id,
            speaking: caucus.speaking.clone(),
            speaker_timer: caucus.speaker_timer,
            caucus_timer: caucus.caucus_timer,
            queue_head: caucus
                .queue
                .iter()
                .next()
                .map(|(key, event)| (key.clone(), event.clone())),
            yielding,
            auto_caucus_timer: settings.auto_caucus_timer,
            timer_reset_seconds,
        }
    }
}

/// Plan the write sequence for a transition without touching the store.
///
/// Two independent phases, each skipped when its input is absent:
/// retiring the current speaker into history, then promoting the queue
/// head into the speaking slot. With neither present the plan is empty.
pub fn plan(lifecycle: &Lifecycle) -> Result<Vec<WriteOp>> {
    let caucus_path = StorePath::caucus(&lifecycle.committee, &lifecycle.caucus)?;
    let speaking_path = caucus_path.clone().child("speaking")?;
    let speaker_timer_path = caucus_path.clone().child("speakerTimer")?;
    let caucus_timer_path = caucus_path.clone().child("caucusTimer")?;

    let mut ops = Vec::new();
    let mut additional_yield_time = 0;

    // Move the person currently speaking into history
    if let Some(speaking) = &lifecycle.speaking {
        // The history record keeps how long they actually spoke, not the
        // time they were allotted
        let spoken = SpeakerEvent {
            duration: lifecycle.speaker_timer.elapsed,
            ..speaking.clone()
        };
        ops.push(WriteOp::Set {
            path: caucus_path.clone().child("history")?.child(&push_key())?,
            value: serde_json::to_value(&spoken)?,
        });
        ops.push(WriteOp::Delete {
            path: speaking_path.clone(),
        });

        if lifecycle.yielding {
            additional_yield_time = lifecycle.speaker_timer.remaining;
        }

        ops.push(WriteOp::Update {
            path: speaker_timer_path.clone(),
            fields: timer_fields(&TimerData::loaded(lifecycle.timer_reset_seconds)),
        });

        if lifecycle.auto_caucus_timer {
            // Stop the caucus timer alongside the speaker timer, keeping
            // its accumulated values
            ops.push(WriteOp::Update {
                path: caucus_timer_path.clone(),
                fields: timer_fields(&lifecycle.caucus_timer.stopped()),
            });
        }
    }

    // Promote the queue head
    if let Some((queue_key, head)) = &lifecycle.queue_head {
        let loaded = head.duration + additional_yield_time;
        let promoted = SpeakerEvent {
            duration: loaded,
            ..head.clone()
        };
        ops.push(WriteOp::Set {
            path: speaking_path,
            value: serde_json::to_value(&promoted)?,
        });
        ops.push(WriteOp::Update {
            path: speaker_timer_path,
            fields: timer_fields(&TimerData::loaded(loaded)),
        });

        if lifecycle.auto_caucus_timer {
            // Redundant when the retire phase already ran, but idempotent
            ops.push(WriteOp::Update {
                path: caucus_timer_path,
                fields: timer_fields(&lifecycle.caucus_timer.stopped()),
            });
        }

        ops.push(WriteOp::Delete {
            path: caucus_path.clone().child("queue")?.child(queue_key)?,
        });
    }

    Ok(ops)
}

/// Run a transition against the store as one atomic batch.
///
/// The speaking slot and queue head are re-read and compared with the
/// snapshots in `lifecycle` first; a mismatch means the records moved
/// underneath the caller (a double-triggered advance, another chair) and
/// the transition aborts with `ConcurrentModification` before writing.
#[instrument(skip_all, fields(committee = %lifecycle.committee, caucus = %lifecycle.caucus))]
pub fn run_lifecycle<S: KeyValueStore>(store: &S, lifecycle: &Lifecycle) -> Result<()> {
    let caucus_path = StorePath::caucus(&lifecycle.committee, &lifecycle.caucus)?;

    let speaking_path = caucus_path.clone().child("speaking")?;
    let current_speaking: Option<SpeakerEvent> = store
        .get(&speaking_path)?
        .map(serde_json::from_value)
        .transpose()?;
    if current_speaking != lifecycle.speaking {
        return Err(Error::ConcurrentModification(speaking_path.to_string()));
    }

    if let Some((queue_key, head)) = &lifecycle.queue_head {
        let head_path = caucus_path.clone().child("queue")?.child(queue_key)?;
        let current_head: Option<SpeakerEvent> = store
            .get(&head_path)?
            .map(serde_json::from_value)
            .transpose()?;
        if current_head.as_ref() != Some(head) {
            return Err(Error::ConcurrentModification(head_path.to_string()));
        }
    }

    let ops = plan(lifecycle)?;
    if ops.is_empty() {
        debug!("lifecycle no-op: nobody speaking and nobody queued");
        return Ok(());
    }
    assert_lifecycle_ops_scoped(&ops, &caucus_path);
    store.apply(&ops)
}

fn timer_fields(timer: &TimerData) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("elapsed".to_string(), json!(timer.elapsed));
    fields.insert("remaining".to_string(), json!(timer.remaining));
    fields.insert("ticking".to_string(), json!(timer.ticking));
    fields
}
