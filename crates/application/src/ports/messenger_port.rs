//! Messenger port - interface to the chat transport
//!
//! The transport (polling loop, API client, webhook handler) lives
//! outside this workspace. The core only needs three operations: send a
//! text with optional inline buttons, edit the last prompt in place, and
//! upload a photo with a caption. All sends are fire-and-forget; the only
//! thing the core reads back is the opaque handle of an uploaded photo.

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use domain::ChatId;

use crate::error::ApplicationError;

/// One inline button: a visible label carrying a selection-token payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Visible caption
    pub label: String,
    /// Wire payload delivered back when pressed
    pub token: String,
}

impl Button {
    /// Create a button
    #[must_use]
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// An inline keyboard as rows of buttons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    /// Button rows, top to bottom
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Build a keyboard from rows
    #[must_use]
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }
}

/// Photo content for an outbound photo message
///
/// `Handle` re-references a previous upload and avoids resending the raw
/// bytes; the transport returned that handle from an earlier `send_photo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoPayload {
    /// Raw image bytes to upload
    Bytes(Vec<u8>),
    /// Opaque handle of a previously uploaded image
    Handle(String),
}

/// Outbound operations the core needs from the chat transport
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Send a new text message with an optional inline keyboard
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), ApplicationError>;

    /// Edit the chat's last prompt message in place
    ///
    /// Used for view refreshes (picker ticks, route-list pages) and for
    /// prompts that replace the previous one after a button press.
    async fn edit_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), ApplicationError>;

    /// Send a photo with a caption
    ///
    /// Returns the transport's opaque handle for the uploaded image so it
    /// can be reused instead of re-uploading identical bytes.
    async fn send_photo(
        &self,
        chat: ChatId,
        photo: PhotoPayload,
        caption: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<String, ApplicationError>;
}
