//! Membership view controller
//!
//! Runs each admin action against the API and feeds the results into
//! [`ViewState`]. Failures are logged and, where the operator needs to know,
//! shown through the [`Notifier`].

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::MembershipApi;
use crate::error::{ClientError, Result};
use crate::form::update_payload;
use crate::grid::RowAction;
use crate::notify::Notifier;
use crate::state::ViewState;

/// Parse a funding amount the way a browser's `parseInt` does: leading
/// whitespace and an optional sign, then as many decimal digits as follow.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub struct MembershipView<A, N> {
    api: A,
    notifier: N,
    state: ViewState,
}

impl<A: MembershipApi, N: Notifier> MembershipView<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Initial load when the view is shown
    pub async fn mount(&mut self) -> Result<()> {
        self.load_members().await
    }

    /// Load the member list into the grid
    pub async fn load_members(&mut self) -> Result<()> {
        let token = self.state.begin_list_load();

        match self.api.list_members().await {
            Ok(members) => {
                debug!("Loaded {} members", members.len());
                self.state.complete_list_load(token, Ok(members));
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load members: {}", e);
                self.state.complete_list_load(token, Err(e.user_message()));
                Err(e)
            }
        }
    }

    pub async fn handle_row_action(&mut self, action: RowAction) -> Result<()> {
        match action {
            RowAction::View(id) => self.view_member(id).await,
        }
    }

    /// Open the detail view for a member and load their health applications.
    ///
    /// Members already in the grid open from the loaded row; others are
    /// fetched first.
    pub async fn view_member(&mut self, id: Uuid) -> Result<()> {
        let token = self.state.begin_detail_load();

        let member = match self.state.find_row(id) {
            Some(row) => row.data.clone(),
            None => match self.api.get_member(id).await {
                Ok(member) => member,
                Err(e) => {
                    warn!("Failed to load member {}: {}", id, e);
                    self.notifier.alert("Error opening data");
                    return Err(e);
                }
            },
        };

        if !self.state.open_detail(token, &member) {
            return Ok(());
        }

        match self.api.list_member_health_applications(member.id).await {
            Ok(applications) => {
                debug!(
                    "Loaded {} health applications for member {}",
                    applications.len(),
                    member.id
                );
                self.state
                    .set_health_applications(token, member.id, applications);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load health applications for {}: {}", member.id, e);
                self.notifier.alert("Error");
                Err(e)
            }
        }
    }

    /// Refresh the open member's health applications and return to the
    /// member view from the health modal
    pub async fn reload_view(&mut self) -> Result<()> {
        let Some(member) = self.state.selected_member() else {
            debug!("No member selected, nothing to reload");
            return Ok(());
        };
        let token = self.state.begin_detail_load();

        match self.api.list_member_health_applications(member).await {
            Ok(applications) => {
                self.state
                    .set_health_applications(token, member, applications);
                self.state.close_health_modal();
                Ok(())
            }
            Err(e) => {
                warn!("Failed to reload health applications for {}: {}", member, e);
                self.notifier.alert("Error");
                Err(e)
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.state.close_detail();
    }

    pub fn change_field(&mut self, key: impl Into<String>, value: Value) {
        self.state.change_field(key, value);
    }

    pub fn change_amount(&mut self, amount: impl Into<String>) {
        self.state.change_amount(amount);
    }

    /// Save the edited member form
    pub async fn update_member(&mut self) -> Result<()> {
        let Some(detail) = self.state.open_detail_view() else {
            self.notifier.alert("No member selected");
            return Err(ClientError::NoSelection);
        };
        let id = detail.member;
        let payload = update_payload(&detail.form);

        match self.api.update_member(id, payload).await {
            Ok(updated) => {
                info!("Updated member {}", updated.id);
                let reload = self.load_members().await;
                self.notifier.alert("Success");
                reload
            }
            Err(e) => {
                warn!("Failed to update member {}: {}", id, e);
                self.notifier.alert("Failed");
                Err(e)
            }
        }
    }

    /// Delete the selected member. Does nothing without a selection.
    pub async fn delete_member(&mut self) -> Result<()> {
        let Some(id) = self.state.selected_member() else {
            return Ok(());
        };

        match self.api.delete_member(id).await {
            Ok(()) => {
                info!("Deleted member {}", id);
                self.state.close_detail();
                self.load_members().await
            }
            Err(e) => {
                warn!("Failed to delete member {}: {}", id, e);
                self.notifier.alert("Failure");
                Err(e)
            }
        }
    }

    /// Fund the selected member's account with the pending amount.
    ///
    /// The list is reloaded after every funding request, whatever its outcome.
    pub async fn submit_amount(&mut self) -> Result<()> {
        let Some(member_id) = self
            .state
            .open_detail_view()
            .and_then(|detail| detail.external_id())
            .map(str::to_string)
        else {
            self.notifier.alert("No member selected");
            return Err(ClientError::NoSelection);
        };

        let raw = self.state.add_amount().to_string();
        let Some(amount) = parse_amount(&raw) else {
            self.notifier.alert("Invalid amount");
            return Err(ClientError::InvalidAmount(raw));
        };

        let result = self.api.fund_member(&member_id, amount).await;
        match &result {
            Ok(member) => {
                info!(
                    "Funded member {} with {}, balance {}",
                    member_id, amount, member.account_balance
                );
                self.notifier.alert("Success");
            }
            Err(e) => {
                warn!("Failed to fund member {}: {}", member_id, e);
                self.notifier.alert(&e.user_message());
            }
        }

        let reload = self.load_members().await;
        result.map(|_| ()).and(reload)
    }

    /// Open the health application modal and load the application
    pub async fn view_health_application(&mut self, id: Uuid) -> Result<()> {
        let token = self.state.open_health_modal(id);

        match self.api.get_health_application(id).await {
            Ok(application) => {
                self.state.complete_health_modal(token, application);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load health application {}: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn close_health_application(&mut self) {
        self.state.close_health_modal();
    }

    /// Approve the application shown in the health modal, then reload the
    /// member view whatever the outcome
    pub async fn approve_health_application(&mut self) -> Result<()> {
        let Some(id) = self.state.health_modal_id() else {
            return Ok(());
        };

        let result = self.api.link_health_application(id).await;
        match &result {
            Ok(application) => {
                info!("Approved health application {}", application.id);
                self.notifier.alert("Success");
            }
            Err(e) => {
                warn!("Failed to approve health application {}: {}", id, e);
                self.notifier.alert(&e.user_message());
            }
        }

        let reload = self.reload_view().await;
        result.map(|_| ()).and(reload)
    }
}
