//! Health application repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::model::HealthApplication;
use crate::Result;

/// Repository interface for health applications
#[async_trait]
pub trait HealthApplicationRepository: Send + Sync {
    /// Store a new application
    async fn create(&self, application: HealthApplication) -> Result<HealthApplication>;

    /// Get an application by ID
    async fn get(&self, id: Uuid) -> Result<Option<HealthApplication>>;

    /// List a member's applications in submission order
    async fn list_by_member(&self, member: Uuid) -> Result<Vec<HealthApplication>>;

    /// Approve an application
    async fn link(&self, id: Uuid) -> Result<HealthApplication>;

    /// Delete every application owned by `member`, returning how many were removed
    async fn delete_by_member(&self, member: Uuid) -> Result<usize>;
}
