//! Single-value key-value slots holding the serialized saved trips.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use common::Error;

/// One persistent string slot. Reads and writes always move the whole value.
pub trait KvSlot: Send + Sync {
    /// Current value, or `None` when nothing has been written yet.
    fn read(&self) -> Result<Option<String>, Error>;

    fn write(&self, value: &str) -> Result<(), Error>;

    fn remove(&self) -> Result<(), Error>;
}

/// Slot backed by a single file on disk.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KvSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, Error> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, value: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, value)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), Error> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-process slot for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, Error> {
        self.value
            .lock()
            .map_err(|_| Error::Storage("memory slot lock poisoned".into()))
    }
}

impl KvSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, Error> {
        Ok(self.lock()?.clone())
    }

    fn write(&self, value: &str) -> Result<(), Error> {
        *self.lock()? = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), Error> {
        *self.lock()? = None;
        Ok(())
    }
}
