//! Member module
//!
//! A Member is an account holder with a funded balance.
//! Health applications reference members by their internal id.

mod file_store;
mod model;
mod repository;

pub use file_store::FileMemberStore;
pub use model::*;
pub use repository::MemberRepository;
