//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the AI gateway.

pub mod coach;
pub mod diary;
pub mod profile;
pub mod user;

pub use coach::CoachService;
pub use diary::DiaryService;
pub use profile::ProfileService;
pub use user::UserService;
