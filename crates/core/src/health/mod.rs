//! Health application module
//!
//! A health application is a member's request for funds against a health
//! reason. Applications are created by a submission flow and approved by
//! linking them to the member's benefit.

mod file_store;
mod model;
mod repository;

pub use file_store::FileHealthApplicationStore;
pub use model::*;
pub use repository::HealthApplicationRepository;
