//! Domain entities

mod announcement;
mod route;
mod session;
mod start_point;

pub use announcement::Announcement;
pub use route::{Route, RouteCatalog};
pub use session::{NavigationFrame, RideDraft, Session, SessionInput, SessionState};
pub use start_point::{StartPoint, StartPointDirectory};
