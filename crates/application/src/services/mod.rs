//! Application services

pub mod announcement_service;
pub mod prompts;
pub mod session_service;

pub use announcement_service::AnnouncementService;
pub use session_service::{SessionService, SessionSettings};
