//! File-based health application storage
//!
//! Applications are kept in submission order. Legacy records found in the
//! file are migrated to the current shape when the store is opened.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::model::{HealthApplication, HealthApplicationDocument};
use super::repository::HealthApplicationRepository;
use crate::{Error, Result};

/// File-based health application store using JSON
pub struct FileHealthApplicationStore {
    path: PathBuf,
    applications: RwLock<Vec<HealthApplication>>,
}

impl FileHealthApplicationStore {
    /// Open the store, migrating any legacy records
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let documents: Vec<HealthApplicationDocument> = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                Error::Storage(format!("Failed to read health applications file: {}", e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                Error::Storage(format!("Failed to parse health applications file: {}", e))
            })?
        } else {
            Vec::new()
        };

        let migrated = documents.iter().filter(|d| d.is_legacy()).count();
        let applications = documents
            .into_iter()
            .map(HealthApplicationDocument::into_current)
            .collect();

        let store = Self {
            path,
            applications: RwLock::new(applications),
        };

        if migrated > 0 {
            store.persist().await?;
            info!("Migrated {} legacy health applications", migrated);
        }

        Ok(store)
    }

    async fn persist(&self) -> Result<()> {
        let applications = self.applications.read().await;
        let content = serde_json::to_string_pretty(&*applications)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl HealthApplicationRepository for FileHealthApplicationStore {
    async fn create(&self, application: HealthApplication) -> Result<HealthApplication> {
        application.validate()?;
        {
            let mut applications = self.applications.write().await;
            if applications.iter().any(|a| a.id == application.id) {
                return Err(Error::Conflict(format!(
                    "Health application with ID {} already exists",
                    application.id
                )));
            }
            applications.push(application.clone());
        }
        self.persist().await?;
        Ok(application)
    }

    async fn get(&self, id: Uuid) -> Result<Option<HealthApplication>> {
        let applications = self.applications.read().await;
        Ok(applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_by_member(&self, member: Uuid) -> Result<Vec<HealthApplication>> {
        let applications = self.applications.read().await;
        Ok(applications
            .iter()
            .filter(|a| a.member == member)
            .cloned()
            .collect())
    }

    async fn link(&self, id: Uuid) -> Result<HealthApplication> {
        let linked = {
            let mut applications = self.applications.write().await;
            let application = applications
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| Error::HealthApplicationNotFound(id.to_string()))?;
            application.link()?;
            application.clone()
        };
        self.persist().await?;
        info!("Linked health application {} for member {}", linked.id, linked.member);
        Ok(linked)
    }

    async fn delete_by_member(&self, member: Uuid) -> Result<usize> {
        let removed = {
            let mut applications = self.applications.write().await;
            let before = applications.len();
            applications.retain(|a| a.member != member);
            before - applications.len()
        };
        if removed > 0 {
            self.persist().await?;
        }
        Ok(removed)
    }
}
