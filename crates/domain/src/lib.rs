//! Domain layer for announceman-rs
//!
//! Contains the core entities and value objects of the ride-announcement
//! bot: routes, start points, sessions with their navigation stack, and
//! the finished announcement. This layer has no I/O and no external
//! collaborators; loading and transport live in the outer crates.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
