//! Ports - interfaces to external collaborators

mod messenger_port;
mod route_scraper_port;

pub use messenger_port::{Button, Keyboard, MessengerPort, PhotoPayload};
pub use route_scraper_port::RouteScraperPort;

#[cfg(test)]
pub use messenger_port::MockMessengerPort;
