//! Health application model definitions
//!
//! Two record shapes exist on disk: the legacy one (with `member_id`,
//! `single_name`, `application_*` fields) and the current one. Only the
//! current shape is ever written; legacy records are migrated on load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A member's request for funds against a stated health reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthApplication {
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Internal id of the owning member
    pub member: Uuid,

    /// Applicant name
    #[serde(default)]
    pub name: String,

    pub dob: NaiveDate,

    pub phone: String,

    pub address: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub postal: String,

    pub amount: f64,

    pub reason: String,

    /// Application covers the member themself
    #[serde(rename = "self", default)]
    pub for_self: bool,

    /// Application covers a dependent child
    #[serde(default)]
    pub child: bool,

    #[serde(default)]
    pub child_name: String,

    #[serde(default)]
    pub common_holder: bool,

    /// Approved and attached to the member's benefit
    #[serde(default)]
    pub linked: bool,

    #[serde(rename = "__v", default)]
    pub version: u32,
}

impl HealthApplication {
    /// Create a new, unlinked application
    pub fn new(
        member: Uuid,
        dob: NaiveDate,
        phone: impl Into<String>,
        address: impl Into<String>,
        amount: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            member,
            name: String::new(),
            dob,
            phone: phone.into(),
            address: address.into(),
            email: String::new(),
            postal: String::new(),
            amount,
            reason: reason.into(),
            for_self: false,
            child: false,
            child_name: String::new(),
            common_holder: false,
            linked: false,
            version: 0,
        }
    }

    /// Set the applicant name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the postal code
    pub fn with_postal(mut self, postal: impl Into<String>) -> Self {
        self.postal = postal.into();
        self
    }

    /// Mark the application as covering the member themself
    pub fn for_self(mut self) -> Self {
        self.for_self = true;
        self
    }

    /// Mark the application as covering a dependent child
    pub fn for_child(mut self, child_name: impl Into<String>) -> Self {
        self.child = true;
        self.child_name = child_name.into();
        self
    }

    /// Set the common holder flag
    pub fn with_common_holder(mut self, common_holder: bool) -> Self {
        self.common_holder = common_holder;
        self
    }

    /// Check the field constraints a stored application must satisfy
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidInput(
                "Amount must be a non-negative number".into(),
            ));
        }
        if self.reason.trim().is_empty() {
            return Err(Error::InvalidInput("Reason cannot be empty".into()));
        }
        if self.phone.trim().is_empty() {
            return Err(Error::InvalidInput("Phone cannot be empty".into()));
        }
        if self.address.trim().is_empty() {
            return Err(Error::InvalidInput("Address cannot be empty".into()));
        }
        Ok(())
    }

    /// Approve the application. Linking is one-way.
    pub fn link(&mut self) -> Result<()> {
        if self.linked {
            return Err(Error::Conflict(format!(
                "Health application {} is already linked",
                self.id
            )));
        }
        self.linked = true;
        self.version += 1;
        Ok(())
    }
}

/// The legacy health application record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyHealthApplication {
    #[serde(rename = "_id")]
    pub id: Uuid,

    pub member: Uuid,

    /// Redundant copy of the owning member's id
    pub member_id: String,

    pub single_name: String,

    pub dob: NaiveDate,

    pub phone: String,

    pub address: String,

    pub amount: f64,

    pub application_reason: String,

    #[serde(default)]
    pub application_self: bool,

    #[serde(default)]
    pub application_child: bool,

    #[serde(default)]
    pub childs_name: String,

    #[serde(default)]
    pub linked: bool,

    #[serde(rename = "__v", default)]
    pub version: u32,
}

impl From<LegacyHealthApplication> for HealthApplication {
    fn from(legacy: LegacyHealthApplication) -> Self {
        Self {
            id: legacy.id,
            member: legacy.member,
            name: legacy.single_name,
            dob: legacy.dob,
            phone: legacy.phone,
            address: legacy.address,
            email: String::new(),
            postal: String::new(),
            amount: legacy.amount,
            reason: legacy.application_reason,
            for_self: legacy.application_self,
            child: legacy.application_child,
            child_name: legacy.childs_name,
            common_holder: false,
            linked: legacy.linked,
            version: legacy.version,
        }
    }
}

/// A stored health application in either shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthApplicationDocument {
    Current(HealthApplication),
    Legacy(LegacyHealthApplication),
}

impl HealthApplicationDocument {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Migrate to the current shape
    pub fn into_current(self) -> HealthApplication {
        match self {
            Self::Current(application) => application,
            Self::Legacy(legacy) => legacy.into(),
        }
    }
}

/// Request to submit a health application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHealthApplicationRequest {
    pub member: Uuid,
    #[serde(default)]
    pub name: String,
    pub dob: NaiveDate,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub postal: String,
    pub amount: f64,
    pub reason: String,
    #[serde(rename = "self", default)]
    pub for_self: bool,
    #[serde(default)]
    pub child: bool,
    #[serde(default)]
    pub child_name: String,
    #[serde(default)]
    pub common_holder: bool,
}

impl CreateHealthApplicationRequest {
    /// Validate and turn the request into a new, unlinked application
    pub fn into_application(self) -> Result<HealthApplication> {
        let mut application = HealthApplication::new(
            self.member,
            self.dob,
            self.phone,
            self.address,
            self.amount,
            self.reason,
        )
        .with_name(self.name)
        .with_email(self.email)
        .with_postal(self.postal)
        .with_common_holder(self.common_holder);
        application.for_self = self.for_self;
        application.child = self.child;
        application.child_name = self.child_name;

        application.validate()?;
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
    }

    #[test]
    fn test_new_application_is_unlinked() {
        let application =
            HealthApplication::new(Uuid::new_v4(), dob(), "0700", "1 Main St", 250.0, "Dental");
        assert!(!application.linked);
        assert!(!application.for_self);
        assert!(!application.child);
        assert!(!application.common_holder);
    }

    #[test]
    fn test_link_is_one_way() {
        let mut application =
            HealthApplication::new(Uuid::new_v4(), dob(), "0700", "1 Main St", 250.0, "Dental");
        application.link().unwrap();
        assert!(application.linked);
        assert_eq!(application.version, 1);

        assert!(matches!(application.link(), Err(Error::Conflict(_))));
        assert!(application.linked);
    }

    #[test]
    fn test_serializes_self_flag_name() {
        let application =
            HealthApplication::new(Uuid::new_v4(), dob(), "0700", "1 Main St", 250.0, "Dental")
                .for_self();
        let value = serde_json::to_value(&application).unwrap();
        assert_eq!(value["self"], json!(true));
        assert_eq!(value["dob"], json!("1990-05-17"));
        assert!(value.get("for_self").is_none());
    }

    #[test]
    fn test_legacy_document_migrates() {
        let id = Uuid::new_v4();
        let member = Uuid::new_v4();
        let raw = json!({
            "_id": id,
            "member": member,
            "member_id": "M-001",
            "single_name": "Ada",
            "dob": "1990-05-17",
            "phone": "0700",
            "address": "1 Main St",
            "amount": 120.5,
            "application_reason": "Physiotherapy",
            "application_child": true,
            "childs_name": "Byron",
            "linked": true,
            "__v": 3
        });

        let document: HealthApplicationDocument = serde_json::from_value(raw).unwrap();
        assert!(document.is_legacy());

        let application = document.into_current();
        assert_eq!(application.id, id);
        assert_eq!(application.member, member);
        assert_eq!(application.name, "Ada");
        assert_eq!(application.reason, "Physiotherapy");
        assert!(application.child);
        assert!(!application.for_self);
        assert_eq!(application.child_name, "Byron");
        assert!(application.linked);
        assert!(!application.common_holder);
        assert_eq!(application.version, 3);
    }

    #[test]
    fn test_current_document_is_not_legacy() {
        let application =
            HealthApplication::new(Uuid::new_v4(), dob(), "0700", "1 Main St", 250.0, "Dental")
                .with_postal("AB1 2CD")
                .with_common_holder(true);
        let raw = serde_json::to_value(&application).unwrap();

        let document: HealthApplicationDocument = serde_json::from_value(raw).unwrap();
        assert!(!document.is_legacy());
        assert_eq!(document.into_current(), application);
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateHealthApplicationRequest = serde_json::from_value(json!({
            "member": Uuid::new_v4(),
            "dob": "1990-05-17",
            "phone": "0700",
            "address": "1 Main St",
            "amount": -1.0,
            "reason": "Dental"
        }))
        .unwrap();
        assert!(matches!(
            request.into_application(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_flags_are_independent() {
        let request: CreateHealthApplicationRequest = serde_json::from_value(json!({
            "member": Uuid::new_v4(),
            "dob": "1990-05-17",
            "phone": "0700",
            "address": "1 Main St",
            "amount": 80,
            "reason": "Optician",
            "self": true,
            "child": true,
            "child_name": "Byron",
            "common_holder": true
        }))
        .unwrap();
        let application = request.into_application().unwrap();
        assert!(application.for_self);
        assert!(application.child);
        assert!(application.common_holder);
        assert_eq!(application.amount, 80.0);
    }
}
