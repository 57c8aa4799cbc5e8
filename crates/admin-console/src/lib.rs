//! Membership admin console
//!
//! Client side of the membership service: an HTTP client for the REST API,
//! the member grid view model, form helpers, and the view controller that
//! drives every admin action through an explicit state machine.

mod api;
mod client;
mod config;
mod error;
pub mod format;
pub mod form;
pub mod grid;
mod notify;
mod state;
mod view;

pub use api::MembershipApi;
pub use client::HttpMembershipClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use notify::{Notifier, TracingNotifier};
pub use state::{
    DetailState, HealthModalState, ListState, MemberDetail, RequestSequence, RequestToken,
    ViewState,
};
pub use view::{parse_amount, MembershipView};
