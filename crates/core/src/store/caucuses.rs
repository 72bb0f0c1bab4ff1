//! Caucus storage operations

use serde_json::to_value;
use tracing::instrument;

use crate::error::Result;
use crate::invariants::assert_caucus_invariants;
use crate::models::{CaucusData, CaucusId, CaucusStatus, CommitteeId, SpeakerEvent};
use super::path::StorePath;
use super::traits::KeyValueStore;

/// CRUD helpers for the caucuses of one committee
pub struct CaucusStore<'a, S: KeyValueStore> {
    store: &'a S,
    committee: CommitteeId,
}

impl<'a, S: KeyValueStore> CaucusStore<'a, S> {
    pub fn new(store: &'a S, committee: CommitteeId) -> Self {
        Self { store, committee }
    }

    /// Create a caucus under a fresh short id and return the id
    #[instrument(skip(self, caucus), fields(committee = %self.committee, name = %caucus.name))]
    pub fn create(&self, caucus: &CaucusData) -> Result<CaucusId> {
        assert_caucus_invariants(caucus);
        let id = CaucusId::generate();
        let path = StorePath::caucus(&self.committee, &id)?;
        self.store.set(&path, to_value(caucus)?)?;
        Ok(id)
    }

    /// Fetch a caucus record
    #[instrument(skip(self), fields(committee = %self.committee))]
    pub fn find_by_id(&self, id: &CaucusId) -> Result<Option<CaucusData>> {
        let path = StorePath::caucus(&self.committee, id)?;
        match self.store.get(&path)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the speaking slot
    #[instrument(skip(self, speaker), fields(committee = %self.committee, who = %speaker.who))]
    pub fn put_speaking(&self, id: &CaucusId, speaker: &SpeakerEvent) -> Result<()> {
        let path = StorePath::caucus(&self.committee, id)?.child("speaking")?;
        self.store.set(&path, to_value(speaker)?)
    }

    /// Close a caucus. `Closed` is terminal; the record is kept, never
    /// deleted.
    #[instrument(skip(self), fields(committee = %self.committee))]
    pub fn close(&self, id: &CaucusId) -> Result<()> {
        let path = StorePath::caucus(&self.committee, id)?.child("status")?;
        self.store.set(&path, to_value(CaucusStatus::Closed)?)
    }

    /// Append a speaker to the queue, returning the queue key
    #[instrument(skip(self, speaker), fields(committee = %self.committee, who = %speaker.who))]
    pub fn enqueue(&self, id: &CaucusId, speaker: &SpeakerEvent) -> Result<String> {
        let path = StorePath::caucus(&self.committee, id)?.child("queue")?;
        self.store.push(&path, to_value(speaker)?)
    }

    /// The next scheduled speaker: the queue entry with the smallest key
    #[instrument(skip(self), fields(committee = %self.committee))]
    pub fn queue_head(&self, id: &CaucusId) -> Result<Option<(String, SpeakerEvent)>> {
        let path = StorePath::caucus(&self.committee, id)?.child("queue")?;
        let queue = match self.store.get(&path)? {
            Some(value) => value,
            None => return Ok(None),
        };
        let queue: std::collections::BTreeMap<String, SpeakerEvent> =
            serde_json::from_value(queue)?;
        Ok(queue.into_iter().next())
    }
}
