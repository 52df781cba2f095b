//! An in-memory vault
//!
//! Handy for tests (including the test harnesses of host applications), and for hosts
//! that keep storage entirely in their own hands. Its [`MockBehaviour`] can make reads
//! and writes fail on purpose, so storage faults can be scripted.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::VaultAdapter;

/// Behaviour tweaks that describe how a [`MemoryVault`] misbehaves during a given test
///
/// So that an operation fails _n_ times after _m_ initial successes, set `(m, n)` for
/// the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every operation will be allowed
    pub is_suspended: bool,

    pub read_behaviour: (u32, u32),
    pub write_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            read_behaviour: (0, n_fails),
            write_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_read(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.read_behaviour, "read")
    }
    pub fn can_write(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.write_behaviour, "write")
    }
}

/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    if value.0 > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if value.1 > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        Ok(())
    }
}


/// A vault that stores its files in memory
#[derive(Debug, Default)]
pub struct MemoryVault {
    files: Mutex<HashMap<PathBuf, String>>,
    folders: Mutex<HashSet<PathBuf>>,
    behaviour: Mutex<MockBehaviour>,
    write_count: Mutex<u32>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, bypassing the mock behaviour
    pub fn insert<P: Into<PathBuf>, C: Into<String>>(&self, path: P, content: C) {
        self.files.lock().unwrap().insert(path.into(), content.into());
    }

    /// Peek at a file, bypassing the mock behaviour
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn remove(&self, path: &Path) {
        self.files.lock().unwrap().remove(path);
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    /// How many writes went through (successfully) since creation
    pub fn write_count(&self) -> u32 {
        *self.write_count.lock().unwrap()
    }
}

#[async_trait]
impl VaultAdapter for MemoryVault {
    async fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.folders.lock().unwrap().contains(path)
    }

    async fn read(&self, path: &Path) -> Result<String, Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_read()?;
        match self.files.lock().unwrap().get(path) {
            Some(content) => Ok(content.clone()),
            None => Err(format!("No such file: {:?}", path).into()),
        }
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_write()?;
        self.files.lock().unwrap().insert(path.to_path_buf(), content.to_string());
        *self.write_count.lock().unwrap() += 1;
        Ok(())
    }

    async fn mkdir(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        self.folders.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}
