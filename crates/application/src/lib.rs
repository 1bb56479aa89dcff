//! Application layer for announceman-rs
//!
//! Orchestrates the conversational form: the per-chat session state
//! machine with its stack-based back/restart navigation, prompt and
//! keyboard rendering, and announcement composition. Talks to the outside
//! world only through the ports defined here.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use services::{AnnouncementService, SessionService, SessionSettings};
