//! Committee settings persistence

use serde_json::to_value;
use tracing::instrument;

use crate::error::Result;
use crate::models::{CommitteeId, SettingsData};
use super::path::StorePath;
use super::traits::KeyValueStore;

/// Feature-flag storage for committees
pub struct SettingsStore<'a, S: KeyValueStore> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> SettingsStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Save committee settings
    #[instrument(skip(self, settings), fields(committee = %committee))]
    pub fn save(&self, committee: &CommitteeId, settings: &SettingsData) -> Result<()> {
        let path = StorePath::settings(committee)?;
        self.store.set(&path, to_value(settings)?)
    }

    /// Load committee settings, falling back to defaults when unset
    #[instrument(skip(self), fields(committee = %committee))]
    pub fn load(&self, committee: &CommitteeId) -> Result<SettingsData> {
        let path = StorePath::settings(committee)?;
        match self.store.get(&path)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(SettingsData::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_load_defaults_when_unset() {
        let store = MemoryStore::new();
        let settings = SettingsStore::new(&store);
        let committee = CommitteeId::new("committee1".to_string());

        let loaded = settings.load(&committee).unwrap();
        assert_eq!(loaded, SettingsData::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let settings = SettingsStore::new(&store);
        let committee = CommitteeId::new("committee1".to_string());

        let custom = SettingsData {
            auto_caucus_timer: false,
            motion_votes: true,
            ..SettingsData::default()
        };
        settings.save(&committee, &custom).unwrap();

        let loaded = settings.load(&committee).unwrap();
        assert_eq!(loaded, custom);
    }
}
