use thiserror::Error;

use crate::domain::ScanHistoryEntry;

use super::store::SlotStore;

pub const HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to encode scan history: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to persist scan history: {0}")]
    Persist(#[from] std::io::Error),
}

/// Most-recent-first list of at most [`HISTORY_CAPACITY`] scans, mirrored to
/// a single storage slot.
///
/// Mutations persist first and only then replace the in-memory list, so a
/// failed write leaves both sides on the previous value.
pub struct HistoryCache {
    store: Box<dyn SlotStore>,
    slot: String,
    entries: Vec<ScanHistoryEntry>,
}

impl HistoryCache {
    /// Never fails: a missing, unreadable or malformed slot starts empty.
    pub fn load(store: Box<dyn SlotStore>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let entries = match store.read(&slot) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ScanHistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(HISTORY_CAPACITY);
                    entries
                }
                Err(err) => {
                    tracing::warn!(target: "history", error = %err, slot = %slot, "discarding malformed scan history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(target: "history", error = %err, slot = %slot, "scan history unreadable; starting empty");
                Vec::new()
            }
        };
        tracing::debug!(target: "history", entries = entries.len(), "scan history loaded");
        Self {
            store,
            slot,
            entries,
        }
    }

    pub fn entries(&self) -> &[ScanHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, entry: ScanHistoryEntry) -> Result<(), HistoryError> {
        let mut next = Vec::with_capacity(HISTORY_CAPACITY);
        next.push(entry);
        next.extend(
            self.entries
                .iter()
                .take(HISTORY_CAPACITY - 1)
                .cloned(),
        );

        let encoded = serde_json::to_string(&next)?;
        self.store.write(&self.slot, &encoded)?;
        self.entries = next;
        tracing::debug!(target: "history", entries = self.entries.len(), "scan recorded");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.store.remove(&self.slot)?;
        self.entries.clear();
        tracing::info!(target: "history", "scan history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        domain::ScanMode,
        history::store::{memory::MemorySlotStore, FileSlotStore},
    };

    const SLOT: &str = "scanHistory";

    fn entry(n: usize) -> ScanHistoryEntry {
        let at = Utc.with_ymd_and_hms(2026, 1, 18, 10, n as u32 % 60, 0).unwrap();
        ScanHistoryEntry::new(ScanMode::Text, format!("message {n}"), "SPAM", &at)
    }

    #[test]
    fn load_returns_min_n_5_most_recent_first() {
        for n in 0..=8 {
            let store = MemorySlotStore::default();
            let mut cache = HistoryCache::load(Box::new(store.clone()), SLOT);
            for i in 0..n {
                cache.record(entry(i)).unwrap();
            }

            let reloaded = HistoryCache::load(Box::new(store), SLOT);
            assert_eq!(reloaded.len(), n.min(HISTORY_CAPACITY), "after {n} records");
            let expected: Vec<_> = (0..n).rev().take(HISTORY_CAPACITY).map(entry).collect();
            assert_eq!(reloaded.entries(), expected.as_slice());
            assert_eq!(cache.entries(), reloaded.entries());
        }
    }

    #[test]
    fn clear_then_load_is_empty() {
        let store = MemorySlotStore::default();
        let mut cache = HistoryCache::load(Box::new(store.clone()), SLOT);
        cache.record(entry(1)).unwrap();
        cache.clear().unwrap();

        assert!(cache.is_empty());
        assert_eq!(store.raw(SLOT), None);
        assert!(HistoryCache::load(Box::new(store), SLOT).is_empty());
    }

    #[test]
    fn malformed_slot_loads_as_empty_and_is_overwritten_on_record() {
        let store = MemorySlotStore::with_value(SLOT, "{not json");
        let mut cache = HistoryCache::load(Box::new(store.clone()), SLOT);
        assert!(cache.is_empty());

        cache.record(entry(7)).unwrap();
        let raw = store.raw(SLOT).unwrap();
        let persisted: Vec<ScanHistoryEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, vec![entry(7)]);
    }

    #[test]
    fn oversized_slot_is_trimmed_on_load() {
        let seven: Vec<_> = (0..7).map(entry).collect();
        let store = MemorySlotStore::with_value(SLOT, &serde_json::to_string(&seven).unwrap());
        let cache = HistoryCache::load(Box::new(store), SLOT);
        assert_eq!(cache.entries(), &seven[..HISTORY_CAPACITY]);
    }

    #[test]
    fn failed_write_keeps_memory_and_storage_in_step() {
        let store = MemorySlotStore::default();
        let mut cache = HistoryCache::load(Box::new(store.clone()), SLOT);
        cache.record(entry(1)).unwrap();
        let persisted_before = store.raw(SLOT);

        store.fail_writes(true);
        assert!(matches!(cache.record(entry(2)), Err(HistoryError::Persist(_))));
        assert!(cache.clear().is_err());

        assert_eq!(cache.entries(), &[entry(1)]);
        assert_eq!(store.raw(SLOT), persisted_before);
    }

    #[test]
    fn survives_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = HistoryCache::load(Box::new(FileSlotStore::new(dir.path())), SLOT);
        for i in 0..3 {
            cache.record(entry(i)).unwrap();
        }
        drop(cache);

        let reloaded = HistoryCache::load(Box::new(FileSlotStore::new(dir.path())), SLOT);
        assert_eq!(reloaded.entries(), &[entry(2), entry(1), entry(0)]);
    }
}
