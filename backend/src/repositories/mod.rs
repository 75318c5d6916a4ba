//! Database repositories
//!
//! Data access layer for the users and logs tables.

pub mod logs;
pub mod user;

pub use logs::LogRepository;
pub use user::{UserRecord, UserRepository};
