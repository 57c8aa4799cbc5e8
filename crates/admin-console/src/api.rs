//! The membership REST API as seen by the console

use async_trait::async_trait;
use mb_core::health::HealthApplication;
use mb_core::member::Member;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Result;

/// One method per endpoint the console consumes
#[async_trait]
pub trait MembershipApi: Send + Sync {
    /// GET /api/membership/
    async fn list_members(&self) -> Result<Vec<Member>>;

    /// GET /api/membership/id/:id
    async fn get_member(&self, id: Uuid) -> Result<Member>;

    /// PUT /api/membership/update/id/:id
    async fn update_member(&self, id: Uuid, fields: Map<String, Value>) -> Result<Member>;

    /// DELETE /api/membership/delete/:id
    async fn delete_member(&self, id: Uuid) -> Result<()>;

    /// PUT /api/membership/fund/:member_id
    async fn fund_member(&self, member_id: &str, amount: i64) -> Result<Member>;

    /// GET /api/health/id/:id
    async fn get_health_application(&self, id: Uuid) -> Result<HealthApplication>;

    /// GET /api/health/member/:id
    async fn list_member_health_applications(
        &self,
        member: Uuid,
    ) -> Result<Vec<HealthApplication>>;

    /// PUT /api/health/link/:id
    async fn link_health_application(&self, id: Uuid) -> Result<HealthApplication>;
}
