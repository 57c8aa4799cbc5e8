//! Core library for the membership admin service
//!
//! This crate contains the document model and storage, including:
//! - Members and their funded account balances
//! - Health applications tied to a member, with legacy record migration

pub mod error;
pub mod health;
pub mod member;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
