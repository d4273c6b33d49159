use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// Named-slot key/value storage backing the history cache.
pub trait SlotStore: Send + Sync {
    fn read(&self, slot: &str) -> io::Result<Option<String>>;
    fn write(&self, slot: &str, value: &str) -> io::Result<()>;
    fn remove(&self, slot: &str) -> io::Result<()>;
}

/// One JSON file per slot. Writes go through a temp file in the same
/// directory followed by a rename, so readers never see a torn value.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, slot: &str, value: &str) -> io::Result<()> {
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.slot_path(slot)).map_err(|err| err.error)?;
        Ok(())
    }

    fn remove(&self, slot: &str) -> io::Result<()> {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::{collections::HashMap, io, sync::Arc};

    use parking_lot::Mutex;

    use super::SlotStore;

    /// In-process store for tests; `fail_writes` simulates a full disk.
    #[derive(Clone, Default)]
    pub struct MemorySlotStore {
        slots: Arc<Mutex<HashMap<String, String>>>,
        fail_writes: Arc<Mutex<bool>>,
    }

    impl MemorySlotStore {
        pub fn with_value(slot: &str, value: &str) -> Self {
            let store = Self::default();
            store.slots.lock().insert(slot.to_string(), value.to_string());
            store
        }

        pub fn raw(&self, slot: &str) -> Option<String> {
            self.slots.lock().get(slot).cloned()
        }

        pub fn fail_writes(&self, fail: bool) {
            *self.fail_writes.lock() = fail;
        }

        fn check(&self) -> io::Result<()> {
            if *self.fail_writes.lock() {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            } else {
                Ok(())
            }
        }
    }

    impl SlotStore for MemorySlotStore {
        fn read(&self, slot: &str) -> io::Result<Option<String>> {
            Ok(self.raw(slot))
        }

        fn write(&self, slot: &str, value: &str) -> io::Result<()> {
            self.check()?;
            self.slots.lock().insert(slot.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, slot: &str) -> io::Result<()> {
            self.check()?;
            self.slots.lock().remove(slot);
            Ok(())
        }
    }
}
