//! In-memory remote store, used when no database is available.

use crate::model::RemoteRepository;

use super::{RemoteStore, Result};

#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    remote: Option<RemoteRepository>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn load(&self) -> Result<Option<RemoteRepository>> {
        Ok(self.remote.clone())
    }

    fn save(&mut self, remote: &RemoteRepository) -> Result<()> {
        self.remote = Some(remote.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.remote = None;
        Ok(())
    }
}
