//! Member repository trait
//!
//! Defines the interface for member storage operations.

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::model::Member;
use crate::Result;

/// Repository interface for member CRUD and funding operations
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Create a new member
    async fn create(&self, member: Member) -> Result<Member>;

    /// Get a member by internal ID
    async fn get(&self, id: Uuid) -> Result<Option<Member>>;

    /// Get a member by external membership ID
    async fn get_by_member_id(&self, member_id: &str) -> Result<Option<Member>>;

    /// Get all members, oldest first
    async fn list(&self) -> Result<Vec<Member>>;

    /// Apply field changes to an existing member
    async fn update(&self, id: Uuid, changes: Map<String, Value>) -> Result<Member>;

    /// Add `amount` to the balance of the member with external ID `member_id`
    async fn fund(&self, member_id: &str, amount: i64) -> Result<Member>;

    /// Delete a member by internal ID
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
