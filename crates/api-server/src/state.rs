//! Application state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use mb_core::health::FileHealthApplicationStore;
use mb_core::member::FileMemberStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    data_dir: PathBuf,
    member_store: FileMemberStore,
    health_store: FileHealthApplicationStore,
    /// Held while a member's existence decides a health application write
    member_lifecycle: Mutex<()>,
}

impl AppState {
    /// Create a new AppState with the given data directory
    pub async fn new(data_dir: PathBuf) -> mb_core::Result<Self> {
        let member_store = FileMemberStore::new(data_dir.join("members.json")).await?;
        let health_store =
            FileHealthApplicationStore::new(data_dir.join("health_applications.json")).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                data_dir,
                member_store,
                health_store,
                member_lifecycle: Mutex::new(()),
            }),
        })
    }

    /// Get reference to the member store
    pub fn member_store(&self) -> &FileMemberStore {
        &self.inner.member_store
    }

    /// Get reference to the health application store
    pub fn health_store(&self) -> &FileHealthApplicationStore {
        &self.inner.health_store
    }

    /// Serialize member deletion with health application submission, so an
    /// application can't be stored against a member deleted in between
    pub async fn lock_member_lifecycle(&self) -> MutexGuard<'_, ()> {
        self.inner.member_lifecycle.lock().await
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }
}
