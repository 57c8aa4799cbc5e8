//! Member model definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result};

/// Fields a caller can never overwrite through [`Member::apply_changes`].
///
/// The balance only moves through [`Member::credit`].
pub const PROTECTED_FIELDS: &[&str] = &["_id", "__v", "created_at", "account_balance"];

/// An account holder record.
///
/// Besides the fields the admin console projects into its grid, a member
/// carries arbitrary profile fields (address, date of birth, ...) that are
/// stored and returned unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Internal identifier
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// External membership identifier, used by the funding endpoint
    pub member_id: String,

    #[serde(default)]
    pub account: String,

    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub mobile: String,

    #[serde(default)]
    pub approved: bool,

    /// Funded balance in whole currency units
    #[serde(default)]
    pub account_balance: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_membership: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    /// Document version, bumped on every write
    #[serde(rename = "__v", default)]
    pub version: u32,

    /// Additional profile fields
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Member {
    /// Create a new member with the required fields
    pub fn new(member_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id: member_id.into(),
            account: String::new(),
            name: name.into(),
            email: String::new(),
            mobile: String::new(),
            approved: false,
            account_balance: 0,
            date_of_membership: None,
            created_at: Utc::now(),
            version: 0,
            profile: Map::new(),
        }
    }

    /// Set the account name
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// Set the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the mobile number
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = mobile.into();
        self
    }

    /// Set the approval flag
    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    /// Set the date of membership
    pub fn with_date_of_membership(mut self, date: NaiveDate) -> Self {
        self.date_of_membership = Some(date);
        self
    }

    /// Set an additional profile field
    pub fn with_profile_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    /// Return a copy of this member with `changes` applied.
    ///
    /// Known fields are type-checked; unknown keys become profile fields.
    /// Identity, version, creation time and balance are never taken from
    /// `changes`.
    pub fn apply_changes(&self, changes: &Map<String, Value>) -> Result<Member> {
        let Value::Object(mut document) = serde_json::to_value(self)? else {
            return Err(Error::Storage("Member did not serialize to an object".into()));
        };

        for (key, value) in changes {
            if PROTECTED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            document.insert(key.clone(), value.clone());
        }

        let mut updated: Member = serde_json::from_value(Value::Object(document))
            .map_err(|e| Error::InvalidInput(format!("Invalid member fields: {}", e)))?;

        if updated.member_id.trim().is_empty() {
            return Err(Error::InvalidInput("Member id cannot be empty".into()));
        }

        updated.version = self.version + 1;
        Ok(updated)
    }

    /// Add `amount` to the account balance
    pub fn credit(&mut self, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Err(Error::InvalidInput(
                "Amount must be a positive number".to_string(),
            ));
        }
        self.account_balance = self
            .account_balance
            .checked_add(amount)
            .ok_or_else(|| Error::InvalidInput("Amount exceeds the maximum balance".into()))?;
        self.version += 1;
        Ok(())
    }
}

/// Request to create a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub member_id: String,

    pub name: String,

    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub mobile: Option<String>,

    #[serde(default)]
    pub approved: bool,

    #[serde(default)]
    pub date_of_membership: Option<NaiveDate>,

    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl CreateMemberRequest {
    /// Validate and turn the request into a new member
    pub fn into_member(self) -> Result<Member> {
        if self.member_id.trim().is_empty() {
            return Err(Error::InvalidInput("Member id cannot be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Name cannot be empty".into()));
        }

        let mut member = Member::new(self.member_id, self.name).with_approved(self.approved);
        if let Some(account) = self.account {
            member = member.with_account(account);
        }
        if let Some(email) = self.email {
            member = member.with_email(email);
        }
        if let Some(mobile) = self.mobile {
            member = member.with_mobile(mobile);
        }
        if let Some(date) = self.date_of_membership {
            member = member.with_date_of_membership(date);
        }
        for (key, value) in self.profile {
            if PROTECTED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            member.profile.insert(key, value);
        }
        Ok(member)
    }
}
