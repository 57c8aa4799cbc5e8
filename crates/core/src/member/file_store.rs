//! File-based member storage implementation
//!
//! Stores members as a JSON array in a file on disk.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::model::Member;
use super::repository::MemberRepository;
use crate::{Error, Result};

/// File-based member store using JSON
pub struct FileMemberStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of members
    cache: RwLock<HashMap<Uuid, Member>>,
}

impl FileMemberStore {
    /// Create a new FileMemberStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let members: Vec<Member> = serde_json::from_str(&content)?;
            members.into_iter().map(|m| (m.id, m)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Persist the cache to disk
    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let mut members: Vec<&Member> = cache.values().collect();
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let content = serde_json::to_string_pretty(&members)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

fn member_id_taken(cache: &HashMap<Uuid, Member>, member_id: &str, except: Uuid) -> bool {
    cache
        .values()
        .any(|m| m.id != except && m.member_id == member_id)
}

#[async_trait]
impl MemberRepository for FileMemberStore {
    async fn create(&self, member: Member) -> Result<Member> {
        {
            let mut cache = self.cache.write().await;
            if cache.contains_key(&member.id) {
                return Err(Error::Conflict(format!(
                    "Member with ID {} already exists",
                    member.id
                )));
            }
            if member_id_taken(&cache, &member.member_id, member.id) {
                return Err(Error::Conflict(format!(
                    "Member ID {} is already in use",
                    member.member_id
                )));
            }
            cache.insert(member.id, member.clone());
        }
        self.persist().await?;
        debug!("Created member {} ({})", member.id, member.member_id);
        Ok(member)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Member>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn get_by_member_id(&self, member_id: &str) -> Result<Option<Member>> {
        let cache = self.cache.read().await;
        Ok(cache.values().find(|m| m.member_id == member_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let cache = self.cache.read().await;
        let mut members: Vec<Member> = cache.values().cloned().collect();
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(members)
    }

    async fn update(&self, id: Uuid, changes: Map<String, Value>) -> Result<Member> {
        let updated = {
            let mut cache = self.cache.write().await;
            let existing = cache
                .get(&id)
                .ok_or_else(|| Error::MemberNotFound(id.to_string()))?;
            let updated = existing.apply_changes(&changes)?;
            if member_id_taken(&cache, &updated.member_id, id) {
                return Err(Error::Conflict(format!(
                    "Member ID {} is already in use",
                    updated.member_id
                )));
            }
            cache.insert(id, updated.clone());
            updated
        };
        self.persist().await?;
        Ok(updated)
    }

    async fn fund(&self, member_id: &str, amount: i64) -> Result<Member> {
        let funded = {
            let mut cache = self.cache.write().await;
            let member = cache
                .values_mut()
                .find(|m| m.member_id == member_id)
                .ok_or_else(|| Error::MemberNotFound(member_id.to_string()))?;
            member.credit(amount)?;
            member.clone()
        };
        self.persist().await?;
        debug!(
            "Funded member {} with {}, balance now {}",
            funded.member_id, amount, funded.account_balance
        );
        Ok(funded)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = {
            let mut cache = self.cache.write().await;
            cache.remove(&id).is_some()
        };
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }
}
