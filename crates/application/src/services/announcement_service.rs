//! Announcement composer
//!
//! Sends the finished announcement as a photo message. The photo payload
//! prefers the route's cached upload handle; the handle returned by the
//! first upload is stored on the route (write-once) and reused by every
//! later announcement referencing the same route.

use std::sync::Arc;

use domain::{Announcement, ChatId, DomainError, RouteCatalog};
use tracing::debug;

use crate::error::ApplicationError;
use crate::ports::{Keyboard, MessengerPort, PhotoPayload};

/// Composes and delivers announcement payloads
pub struct AnnouncementService {
    messenger: Arc<dyn MessengerPort>,
    catalog: Arc<RouteCatalog>,
}

impl std::fmt::Debug for AnnouncementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnouncementService")
            .field("catalog_len", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl AnnouncementService {
    /// Create the service
    #[must_use]
    pub fn new(messenger: Arc<dyn MessengerPort>, catalog: Arc<RouteCatalog>) -> Self {
        Self { messenger, catalog }
    }

    /// Send the announcement to the given chat
    ///
    /// Resolves the route preview through the cached handle when present,
    /// uploading the raw bytes only on the route's first ever send.
    pub async fn send(
        &self,
        chat: ChatId,
        announcement: &Announcement,
        keyboard: Option<Keyboard>,
    ) -> Result<(), ApplicationError> {
        let route = self.catalog.get(announcement.route_index).ok_or(
            DomainError::RouteIndexOutOfRange {
                index: announcement.route_index,
                len: self.catalog.len(),
            },
        )?;

        let payload = route.preview_handle().map_or_else(
            || PhotoPayload::Bytes(route.preview_image.clone()),
            |handle| PhotoPayload::Handle(handle.to_string()),
        );
        let first_upload = matches!(payload, PhotoPayload::Bytes(_));

        let handle = self
            .messenger
            .send_photo(chat, payload, &announcement.message_text(), keyboard)
            .await?;

        if first_upload {
            debug!(route = %route.name, "Storing preview upload handle");
            route.set_preview_handle(handle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Pace, RideDraft, Route};
    use mockall::predicate::{always, eq};

    use crate::ports::MockMessengerPort;

    fn catalog() -> Arc<RouteCatalog> {
        Arc::new(RouteCatalog::new(vec![Route::new(
            "Loop",
            "42 km",
            "500 m",
            "https://example.com/loop",
            vec![9, 9, 9],
        )]))
    }

    fn announcement() -> Announcement {
        let draft = RideDraft {
            date: Some("March 10".to_string()),
            time: Some("07:15".to_string()),
            route_index: Some(0),
            start_point: Some("[F](https://maps/f)".to_string()),
            pace: Some(Pace::Z2),
        };
        Announcement::from_draft(&draft, "[Loop](https://example.com/loop) | 42 km | 500 m", "u")
            .unwrap()
    }

    #[tokio::test]
    async fn first_send_uploads_bytes_and_caches_handle() {
        let catalog = catalog();
        let mut messenger = MockMessengerPort::new();
        messenger
            .expect_send_photo()
            .with(
                eq(ChatId::new(1)),
                eq(PhotoPayload::Bytes(vec![9, 9, 9])),
                always(),
                always(),
            )
            .times(1)
            .returning(|_, _, _, _| Ok("file-1".to_string()));

        let service = AnnouncementService::new(Arc::new(messenger), Arc::clone(&catalog));
        service.send(ChatId::new(1), &announcement(), None).await.unwrap();

        assert_eq!(catalog.get(0).unwrap().preview_handle(), Some("file-1"));
    }

    #[tokio::test]
    async fn later_sends_reuse_the_handle() {
        let catalog = catalog();
        catalog.get(0).unwrap().set_preview_handle("file-1".to_string());

        let mut messenger = MockMessengerPort::new();
        messenger
            .expect_send_photo()
            .with(
                eq(ChatId::new(2)),
                eq(PhotoPayload::Handle("file-1".to_string())),
                always(),
                always(),
            )
            .times(1)
            .returning(|_, _, _, _| Ok("file-2".to_string()));

        let service = AnnouncementService::new(Arc::new(messenger), Arc::clone(&catalog));
        service.send(ChatId::new(2), &announcement(), None).await.unwrap();

        // The handle from the re-send never overwrites the first one
        assert_eq!(catalog.get(0).unwrap().preview_handle(), Some("file-1"));
    }

    #[tokio::test]
    async fn unknown_route_index_is_an_error() {
        let messenger = MockMessengerPort::new();
        let service = AnnouncementService::new(Arc::new(messenger), catalog());

        let mut ann = announcement();
        ann.route_index = 7;
        let err = service.send(ChatId::new(1), &ann, None).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::RouteIndexOutOfRange { index: 7, .. })
        ));
    }
}
