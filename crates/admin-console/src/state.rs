//! Membership view state
//!
//! All UI state lives in [`ViewState`] and only changes through its
//! transition methods. Every load takes a [`RequestToken`]; a completion
//! whose token is no longer the latest one for its channel is discarded, so
//! a slow response can never overwrite the result of a newer request.

use mb_core::health::HealthApplication;
use mb_core::member::Member;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::form::{
    form_fields, to_document, FormField, HealthApplicationView, MEMBER_FORM_EXCLUDED,
};
use crate::grid::{member_rows, MemberRow};

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic token source for one request channel
#[derive(Debug, Default, Clone)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// Member list lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Idle,
    Loading(RequestToken),
    Loaded,
    Failed(String),
}

/// The open member detail view
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDetail {
    pub member: Uuid,
    /// Editable copy of the member document
    pub form: Map<String, Value>,
    pub health_applications: Vec<HealthApplication>,
}

impl MemberDetail {
    /// External membership id from the form, used for funding
    pub fn external_id(&self) -> Option<&str> {
        self.form
            .get("member_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// The editable member form as rendered, without version or balance
    pub fn fields(&self) -> Vec<FormField> {
        form_fields(&self.form, MEMBER_FORM_EXCLUDED)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Closed,
    Open(MemberDetail),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HealthModalState {
    Closed,
    Open {
        id: Uuid,
        application: Option<HealthApplication>,
    },
}

pub const DEFAULT_ADD_AMOUNT: &str = "1000";

#[derive(Debug, Clone)]
pub struct ViewState {
    rows: Vec<MemberRow>,
    list: ListState,
    detail: DetailState,
    health_modal: HealthModalState,
    add_amount: String,
    list_requests: RequestSequence,
    detail_requests: RequestSequence,
    health_requests: RequestSequence,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            list: ListState::Idle,
            detail: DetailState::Closed,
            health_modal: HealthModalState::Closed,
            add_amount: DEFAULT_ADD_AMOUNT.to_string(),
            list_requests: RequestSequence::default(),
            detail_requests: RequestSequence::default(),
            health_requests: RequestSequence::default(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[MemberRow] {
        &self.rows
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.list, ListState::Loading(_))
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn open_detail_view(&self) -> Option<&MemberDetail> {
        match &self.detail {
            DetailState::Open(detail) => Some(detail),
            DetailState::Closed => None,
        }
    }

    pub fn health_modal(&self) -> &HealthModalState {
        &self.health_modal
    }

    pub fn add_amount(&self) -> &str {
        &self.add_amount
    }

    /// Internal id of the member whose detail view is open
    pub fn selected_member(&self) -> Option<Uuid> {
        self.open_detail_view().map(|detail| detail.member)
    }

    pub fn find_row(&self, id: Uuid) -> Option<&MemberRow> {
        self.rows.iter().find(|row| row.aid == id)
    }

    // ------------------------------------------------------------------
    // Member list
    // ------------------------------------------------------------------

    pub fn begin_list_load(&mut self) -> RequestToken {
        let token = self.list_requests.issue();
        self.list = ListState::Loading(token);
        token
    }

    /// Apply a list response. Returns false if the response was stale.
    ///
    /// A failure keeps the rows already shown. On success the open detail
    /// form is refreshed from the matching new row.
    pub fn complete_list_load(
        &mut self,
        token: RequestToken,
        result: std::result::Result<Vec<Member>, String>,
    ) -> bool {
        if !self.list_requests.is_current(token) {
            debug!("Discarding stale member list response {:?}", token);
            return false;
        }

        match result {
            Ok(members) => {
                self.rows = member_rows(members);
                self.list = ListState::Loaded;

                if let DetailState::Open(detail) = &mut self.detail {
                    if let Some(row) = self.rows.iter().find(|row| row.aid == detail.member) {
                        detail.form = to_document(&row.data);
                    }
                }
            }
            Err(message) => {
                self.list = ListState::Failed(message);
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Member detail
    // ------------------------------------------------------------------

    pub fn begin_detail_load(&mut self) -> RequestToken {
        self.detail_requests.issue()
    }

    /// Open the detail view on `member`. Returns false if the load was stale.
    pub fn open_detail(&mut self, token: RequestToken, member: &Member) -> bool {
        if !self.detail_requests.is_current(token) {
            debug!("Discarding stale member detail for {}", member.id);
            return false;
        }

        let health_applications = match &self.detail {
            DetailState::Open(detail) if detail.member == member.id => {
                detail.health_applications.clone()
            }
            _ => Vec::new(),
        };
        self.detail = DetailState::Open(MemberDetail {
            member: member.id,
            form: to_document(member),
            health_applications,
        });
        true
    }

    /// Store the health applications loaded for the open member
    pub fn set_health_applications(
        &mut self,
        token: RequestToken,
        member: Uuid,
        applications: Vec<HealthApplication>,
    ) -> bool {
        if !self.detail_requests.is_current(token) {
            debug!("Discarding stale health applications for {}", member);
            return false;
        }
        match &mut self.detail {
            DetailState::Open(detail) if detail.member == member => {
                detail.health_applications = applications;
                true
            }
            _ => false,
        }
    }

    /// Close the detail view and forget the selection
    pub fn close_detail(&mut self) {
        // Invalidate any detail load still in flight
        self.detail_requests.issue();
        self.detail = DetailState::Closed;
    }

    pub fn change_field(&mut self, key: impl Into<String>, value: Value) -> bool {
        match &mut self.detail {
            DetailState::Open(detail) => {
                detail.form.insert(key.into(), value);
                true
            }
            DetailState::Closed => false,
        }
    }

    pub fn change_amount(&mut self, amount: impl Into<String>) {
        self.add_amount = amount.into();
    }

    // ------------------------------------------------------------------
    // Health application modal
    // ------------------------------------------------------------------

    pub fn open_health_modal(&mut self, id: Uuid) -> RequestToken {
        let token = self.health_requests.issue();
        self.health_modal = HealthModalState::Open {
            id,
            application: None,
        };
        token
    }

    pub fn complete_health_modal(
        &mut self,
        token: RequestToken,
        application: HealthApplication,
    ) -> bool {
        if !self.health_requests.is_current(token) {
            debug!("Discarding stale health application {}", application.id);
            return false;
        }
        match &mut self.health_modal {
            HealthModalState::Open {
                id,
                application: slot,
            } if *id == application.id => {
                *slot = Some(application);
                true
            }
            _ => false,
        }
    }

    pub fn close_health_modal(&mut self) {
        self.health_requests.issue();
        self.health_modal = HealthModalState::Closed;
    }

    pub fn health_modal_id(&self) -> Option<Uuid> {
        match &self.health_modal {
            HealthModalState::Open { id, .. } => Some(*id),
            HealthModalState::Closed => None,
        }
    }

    /// Rendered content of the health modal, once its application has loaded
    pub fn health_view(&self) -> Option<HealthApplicationView> {
        match &self.health_modal {
            HealthModalState::Open {
                application: Some(application),
                ..
            } => Some(HealthApplicationView::new(application)),
            _ => None,
        }
    }
}
