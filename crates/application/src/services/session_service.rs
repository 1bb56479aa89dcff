//! Session state machine
//!
//! Drives the conversational form through
//! `Date -> Time -> TrackSelect -> StartPointSelect -> Pace -> Completed`.
//!
//! The transition core ([`SessionService::apply`]) is synchronous and runs
//! under the session-registry lock, so events for one chat are applied
//! strictly in arrival order and never concurrently. All outbound sends
//! happen after the lock is released.
//!
//! Go-back is undo-by-replay: the stack logs every state-advancing
//! (state, input) pair; "back" discards the top frame and re-dispatches
//! the frame below through the same transition logic with recording
//! suppressed, so the replayed frame is reused rather than duplicated.
//! View refreshes (picker ticks, route-list pages) are never logged. The
//! pace input that completes the session is never logged either, which
//! keeps the announcement side effect structurally unreachable via replay.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use domain::{
    Announcement, ChatId, Pace, RouteCatalog, SelectionToken, Session, SessionInput, SessionState,
    StartPointDirectory, TimePicker,
};
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{MessengerPort, PhotoPayload, RouteScraperPort};
use crate::services::announcement_service::AnnouncementService;
use crate::services::prompts;

/// Tunables injected from configuration
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Timezone for the Today/Tomorrow date presets
    pub timezone: Tz,
    /// Picker hour shown on first entry to the time step
    pub default_hour: u8,
    /// Picker minute shown on first entry to the time step
    pub default_minute: u8,
    /// Routes per page in the track listing
    pub page_len: usize,
    /// Broadcast chat for the post-to-channel action, if configured
    pub channel: Option<ChatId>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            default_hour: 10,
            default_minute: 0,
            page_len: 10,
            channel: None,
        }
    }
}

/// What a transition decided to do, rendered after the lock is dropped
#[derive(Debug)]
enum StepOutcome {
    /// Structurally invalid input: no frame, no state change, no render
    Ignored,
    /// Render the prompt of the (new) current state
    Prompt {
        state: SessionState,
        /// Edit the previous prompt in place instead of sending anew
        edit: bool,
        /// Picker snapshot for the time prompt
        picker: Option<TimePicker>,
    },
    /// Re-render the route list at another page (view refresh)
    RoutePage { offset: usize },
    /// Session completed; compose and send the announcement
    Finalized { announcement: Announcement },
}

/// Per-chat session registry and state machine orchestrator
pub struct SessionService {
    messenger: Arc<dyn MessengerPort>,
    scraper: Option<Arc<dyn RouteScraperPort>>,
    catalog: Arc<RouteCatalog>,
    directory: Arc<StartPointDirectory>,
    announcer: AnnouncementService,
    settings: SessionSettings,
    sessions: Mutex<HashMap<ChatId, Session>>,
    /// Last completed announcement per chat, backing post-to-channel
    completed: Mutex<HashMap<ChatId, Announcement>>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("catalog_len", &self.catalog.len())
            .field("directory_len", &self.directory.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SessionService {
    /// Create the service over an already loaded catalog and directory
    #[must_use]
    pub fn new(
        messenger: Arc<dyn MessengerPort>,
        catalog: Arc<RouteCatalog>,
        directory: Arc<StartPointDirectory>,
        settings: SessionSettings,
    ) -> Self {
        let announcer = AnnouncementService::new(Arc::clone(&messenger), Arc::clone(&catalog));
        Self {
            messenger,
            scraper: None,
            catalog,
            directory,
            announcer,
            settings,
            sessions: Mutex::new(HashMap::new()),
            completed: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a scraper for the on-demand preview command
    #[must_use]
    pub fn with_scraper(mut self, scraper: Arc<dyn RouteScraperPort>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    /// Start (or restart) a session for the chat and prompt for the date
    #[instrument(skip(self, display_name), fields(chat = %chat))]
    pub async fn handle_start(
        &self,
        chat: ChatId,
        display_name: &str,
    ) -> Result<(), ApplicationError> {
        let submitter = format!("[{display_name}](tg://user?id={chat})");
        self.sessions.lock().insert(chat, Session::new(submitter));

        let now = Utc::now().with_timezone(&self.settings.timezone);
        let (text, keyboard) = prompts::date_prompt(now);
        self.messenger.send_text(chat, &text, Some(keyboard)).await
    }

    /// Cancel and clear the chat's session, if any
    #[instrument(skip(self), fields(chat = %chat))]
    pub async fn handle_cancel(&self, chat: ChatId) -> Result<(), ApplicationError> {
        if self.sessions.lock().remove(&chat).is_none() {
            return Ok(());
        }
        debug!("Session cancelled");
        self.messenger.send_text(chat, "Cancelled.", None).await
    }

    /// Handle a typed text message
    pub async fn handle_text(&self, chat: ChatId, text: &str) -> Result<(), ApplicationError> {
        self.dispatch(chat, SessionInput::Text(text.to_string())).await
    }

    /// Handle an inline-button press
    ///
    /// Payloads outside the token vocabulary (date presets, pace labels)
    /// are routed as free text, exactly as if the user had typed them.
    pub async fn handle_selection(&self, chat: ChatId, data: &str) -> Result<(), ApplicationError> {
        match SelectionToken::parse(data) {
            Some(SelectionToken::PostToChannel) => self.post_to_channel(chat).await,
            Some(token) => self.dispatch(chat, SessionInput::Token(token)).await,
            None => self.dispatch(chat, SessionInput::Text(data.to_string())).await,
        }
    }

    /// Scrape an arbitrary route URL and send its annotated preview
    ///
    /// Network-bound, so the fetch runs in a spawned task and the result
    /// is delivered fire-and-forget; session state is never touched, so a
    /// result landing after a cancel has nothing to apply to.
    #[instrument(skip(self), fields(chat = %chat, url = %url))]
    pub async fn handle_preview(&self, chat: ChatId, url: &str) -> Result<(), ApplicationError> {
        let Some(scraper) = self.scraper.as_ref().map(Arc::clone) else {
            return self
                .messenger
                .send_text(chat, "Route previews are not available", None)
                .await;
        };

        let messenger = Arc::clone(&self.messenger);
        let url = url.to_string();
        tokio::spawn(async move {
            match scraper.load_route(&url, None, None).await {
                Ok(route) => {
                    let _ = messenger
                        .send_photo(chat, PhotoPayload::Bytes(route.preview_image), &route.caption, None)
                        .await;
                },
                Err(e) => {
                    warn!(url = %url, error = %e, "Preview scrape failed");
                    let _ = messenger
                        .send_text(chat, "Failed to load a preview for that link", None)
                        .await;
                },
            }
        });
        Ok(())
    }

    /// Apply one input under the registry lock, then render the outcome
    async fn dispatch(&self, chat: ChatId, input: SessionInput) -> Result<(), ApplicationError> {
        let outcome = {
            let mut sessions = self.sessions.lock();
            let Some(session) = sessions.get_mut(&chat) else {
                debug!(chat = %chat, "Input without a session, ignoring");
                return Ok(());
            };

            let outcome = match &input {
                SessionInput::Token(SelectionToken::Restart) => {
                    session.restart();
                    Ok(StepOutcome::Prompt {
                        state: SessionState::Date,
                        edit: true,
                        picker: None,
                    })
                },
                SessionInput::Token(SelectionToken::GoBack) => self.go_back(session),
                _ => self.apply(session, &input, true),
            }?;

            if let StepOutcome::Finalized { announcement } = &outcome {
                self.completed.lock().insert(chat, announcement.clone());
                sessions.remove(&chat);
            }
            outcome
        };
        self.render(chat, outcome).await
    }

    /// The go-back protocol: pop, then replay the frame below
    ///
    /// The first pop discards the frame for the step being left. If the
    /// stack is then empty, back degrades to restart. Otherwise the top
    /// frame is replayed through [`Self::apply`] with recording off: the
    /// machine is rewound to the frame's state and the original input is
    /// fed through again, re-deriving the draft slot and re-rendering the
    /// following prompt without logging a duplicate frame.
    fn go_back(&self, session: &mut Session) -> Result<StepOutcome, ApplicationError> {
        session.pop_frame();
        match session.last_frame().cloned() {
            None => {
                session.restart();
                Ok(StepOutcome::Prompt {
                    state: SessionState::Date,
                    edit: true,
                    picker: None,
                })
            },
            Some(frame) => {
                session.state = frame.state;
                // A replay is always triggered by a button press, so the
                // re-derived prompt edits the pressed message in place.
                match self.apply(session, &frame.input, false)? {
                    StepOutcome::Prompt { state, picker, .. } => Ok(StepOutcome::Prompt {
                        state,
                        edit: true,
                        picker,
                    }),
                    other => Ok(other),
                }
            },
        }
    }

    /// The forward transition function, shared by dispatch and replay
    ///
    /// Structurally invalid input for the current state is a silent no-op
    /// by design: nothing is pushed, nothing changes, nothing is sent.
    /// `record` is false during go-back replay.
    #[allow(clippy::too_many_lines)]
    fn apply(
        &self,
        session: &mut Session,
        input: &SessionInput,
        record: bool,
    ) -> Result<StepOutcome, ApplicationError> {
        match (session.state, input) {
            (SessionState::Date, SessionInput::Text(text)) if !text.trim().is_empty() => {
                session.draft.date = Some(text.trim().to_string());
                if record {
                    session.push_frame(SessionState::Date, input.clone());
                }
                if session.picker.is_none() {
                    session.picker = Some(TimePicker::new(
                        self.settings.default_hour,
                        self.settings.default_minute,
                    )?);
                }
                session.state = SessionState::Time;
                Ok(StepOutcome::Prompt {
                    state: SessionState::Time,
                    edit: false,
                    picker: session.picker,
                })
            },

            (
                SessionState::Time,
                SessionInput::Token(
                    token @ (SelectionToken::UpHour
                    | SelectionToken::DownHour
                    | SelectionToken::UpMinute
                    | SelectionToken::DownMinute),
                ),
            ) => {
                // View refresh: mutate the picker, never the stack
                let Some(picker) = session.picker.as_mut() else {
                    return Ok(StepOutcome::Ignored);
                };
                match token {
                    SelectionToken::UpHour => picker.up_hour(),
                    SelectionToken::DownHour => picker.down_hour(),
                    SelectionToken::UpMinute => picker.up_minute(),
                    SelectionToken::DownMinute => picker.down_minute(),
                    _ => {},
                }
                Ok(StepOutcome::Prompt {
                    state: SessionState::Time,
                    edit: true,
                    picker: session.picker,
                })
            },

            (SessionState::Time, SessionInput::Token(SelectionToken::NoAction)) => {
                Ok(StepOutcome::Ignored)
            },

            (SessionState::Time, SessionInput::Token(SelectionToken::SavePicker)) => {
                let picker = match session.picker {
                    Some(p) => p,
                    None => TimePicker::new(
                        self.settings.default_hour,
                        self.settings.default_minute,
                    )?,
                };
                session.draft.time = Some(picker.to_string());
                if record {
                    session.push_frame(SessionState::Time, input.clone());
                }
                session.state = SessionState::TrackSelect;
                Ok(StepOutcome::Prompt {
                    state: SessionState::TrackSelect,
                    edit: true,
                    picker: None,
                })
            },

            (SessionState::TrackSelect, SessionInput::Token(SelectionToken::Page(page)))
                if *page < self.catalog.total_pages(self.settings.page_len) =>
            {
                // Pure view refresh: no frame, no state change
                Ok(StepOutcome::RoutePage { offset: *page })
            },

            (SessionState::TrackSelect, SessionInput::Token(SelectionToken::Route(index)))
                if *index < self.catalog.len() =>
            {
                session.draft.route_index = Some(*index);
                if record {
                    session.push_frame(SessionState::TrackSelect, input.clone());
                }
                session.state = SessionState::StartPointSelect;
                Ok(StepOutcome::Prompt {
                    state: SessionState::StartPointSelect,
                    edit: true,
                    picker: None,
                })
            },

            (
                SessionState::StartPointSelect,
                SessionInput::Token(SelectionToken::StartPoint(handle)),
            ) if *handle < self.directory.len() => {
                let Some(start_point) = self.directory.get(*handle) else {
                    return Ok(StepOutcome::Ignored);
                };
                session.draft.start_point = Some(start_point.formatted());
                if record {
                    session.push_frame(SessionState::StartPointSelect, input.clone());
                }
                session.state = SessionState::Pace;
                Ok(StepOutcome::Prompt {
                    state: SessionState::Pace,
                    edit: true,
                    picker: None,
                })
            },

            (SessionState::Pace, SessionInput::Text(text)) => {
                let Some(pace) = Pace::parse(text) else {
                    return Ok(StepOutcome::Ignored);
                };
                session.draft.pace = Some(pace);
                // Deliberately unrecorded: completing the form emits the
                // announcement, and that side effect must stay out of
                // reach of go-back replay.
                session.state = SessionState::Completed;

                let index = session.draft.route_index.ok_or_else(|| {
                    ApplicationError::Internal("pace step without a route".to_string())
                })?;
                let route = self.catalog.get(index).ok_or(
                    domain::DomainError::RouteIndexOutOfRange {
                        index,
                        len: self.catalog.len(),
                    },
                )?;
                let announcement =
                    Announcement::from_draft(&session.draft, &route.caption, &session.submitter)?;
                Ok(StepOutcome::Finalized { announcement })
            },

            _ => Ok(StepOutcome::Ignored),
        }
    }

    /// Render a transition outcome to the messenger
    async fn render(&self, chat: ChatId, outcome: StepOutcome) -> Result<(), ApplicationError> {
        match outcome {
            StepOutcome::Ignored => Ok(()),

            StepOutcome::Prompt { state, edit, picker } => {
                let (text, keyboard) = match state {
                    SessionState::Date => {
                        let now = Utc::now().with_timezone(&self.settings.timezone);
                        prompts::date_prompt(now)
                    },
                    SessionState::Time => {
                        let picker = match picker {
                            Some(p) => p,
                            None => TimePicker::new(
                                self.settings.default_hour,
                                self.settings.default_minute,
                            )?,
                        };
                        prompts::time_prompt(picker)
                    },
                    SessionState::TrackSelect => {
                        prompts::route_list(&self.catalog, 0, self.settings.page_len)
                    },
                    SessionState::StartPointSelect => prompts::start_point_prompt(&self.directory),
                    SessionState::Pace => prompts::pace_prompt(),
                    SessionState::Completed => return Ok(()),
                };
                if edit {
                    self.messenger.edit_text(chat, &text, Some(keyboard)).await
                } else {
                    self.messenger.send_text(chat, &text, Some(keyboard)).await
                }
            },

            StepOutcome::RoutePage { offset } => {
                let (text, keyboard) =
                    prompts::route_list(&self.catalog, offset, self.settings.page_len);
                self.messenger.edit_text(chat, &text, Some(keyboard)).await
            },

            StepOutcome::Finalized { announcement } => {
                let keyboard =
                    self.settings.channel.map(|_| prompts::announcement_keyboard());
                self.announcer.send(chat, &announcement, keyboard).await
            },
        }
    }

    /// Re-send the chat's last completed announcement to the channel
    async fn post_to_channel(&self, chat: ChatId) -> Result<(), ApplicationError> {
        let Some(channel) = self.settings.channel else {
            return Ok(());
        };
        let announcement = self.completed.lock().get(&chat).cloned();
        match announcement {
            Some(announcement) => {
                debug!(chat = %chat, channel = %channel, "Posting announcement to channel");
                self.announcer.send(channel, &announcement, None).await
            },
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::Route;

    use crate::ports::Keyboard;

    /// One recorded outbound call
    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Text { chat: ChatId, text: String, keyboard: Option<Keyboard> },
        Edit { chat: ChatId, text: String, keyboard: Option<Keyboard> },
        Photo { chat: ChatId, payload: PhotoPayload, caption: String, keyboard: Option<Keyboard> },
    }

    /// Recording fake for the messenger port
    #[derive(Debug, Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<Sent>>,
    }

    impl RecordingMessenger {
        fn log(&self) -> Vec<Sent> {
            self.sent.lock().clone()
        }

        fn last(&self) -> Sent {
            self.sent.lock().last().cloned().expect("nothing was sent")
        }

        fn count(&self) -> usize {
            self.sent.lock().len()
        }
    }

    #[async_trait]
    impl MessengerPort for RecordingMessenger {
        async fn send_text(
            &self,
            chat: ChatId,
            text: &str,
            keyboard: Option<Keyboard>,
        ) -> Result<(), ApplicationError> {
            self.sent.lock().push(Sent::Text { chat, text: text.to_string(), keyboard });
            Ok(())
        }

        async fn edit_text(
            &self,
            chat: ChatId,
            text: &str,
            keyboard: Option<Keyboard>,
        ) -> Result<(), ApplicationError> {
            self.sent.lock().push(Sent::Edit { chat, text: text.to_string(), keyboard });
            Ok(())
        }

        async fn send_photo(
            &self,
            chat: ChatId,
            photo: PhotoPayload,
            caption: &str,
            keyboard: Option<Keyboard>,
        ) -> Result<String, ApplicationError> {
            self.sent.lock().push(Sent::Photo {
                chat,
                payload: photo,
                caption: caption.to_string(),
                keyboard,
            });
            Ok(format!("upload-{chat}"))
        }
    }

    const CHAT: ChatId = ChatId::new(7);
    const CHANNEL: ChatId = ChatId::new(-100);

    fn route(name: &str) -> Route {
        Route::new(name, "42 km", "500 m", format!("https://example.com/{name}"), vec![1, 2, 3])
    }

    fn fixture() -> (Arc<RecordingMessenger>, SessionService) {
        let messenger = Arc::new(RecordingMessenger::default());
        let catalog = Arc::new(RouteCatalog::new(vec![
            route("Alpine"),
            route("Bay"),
            route("Coast"),
            route("Delta"),
            route("Escarpment"),
        ]));
        let directory = Arc::new(StartPointDirectory::new([
            ("Bridge".to_string(), "https://maps/bridge".to_string(), Some("City".to_string())),
            ("Fountain".to_string(), "https://maps/fountain".to_string(), Some("City".to_string())),
            ("Velodrome".to_string(), "https://maps/velo".to_string(), None),
        ]));
        let settings = SessionSettings {
            default_hour: 10,
            default_minute: 0,
            page_len: 2,
            channel: Some(CHANNEL),
            ..SessionSettings::default()
        };
        let service = SessionService::new(
            Arc::clone(&messenger) as Arc<dyn MessengerPort>,
            catalog,
            directory,
            settings,
        );
        (messenger, service)
    }

    fn session_state(service: &SessionService, chat: ChatId) -> Option<(SessionState, usize)> {
        service.sessions.lock().get(&chat).map(|s| (s.state, s.depth()))
    }

    /// Drive a session from /start up to the pace prompt at 07:15, route 1,
    /// start point 2
    async fn advance_to_pace(service: &SessionService) {
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_text(CHAT, "March 10").await.unwrap();
        for _ in 0..3 {
            service.handle_selection(CHAT, "picker-down-hour-data").await.unwrap();
        }
        service.handle_selection(CHAT, "picker-up-minute-data").await.unwrap();
        service.handle_selection(CHAT, "picker-save-data").await.unwrap();
        service.handle_selection(CHAT, "route-1").await.unwrap();
        service.handle_selection(CHAT, "start-point-2").await.unwrap();
    }

    #[tokio::test]
    async fn start_prompts_for_date() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();

        match messenger.last() {
            Sent::Text { chat, text, keyboard } => {
                assert_eq!(chat, CHAT);
                assert_eq!(text, "Pick a date");
                assert!(keyboard.is_some());
            },
            other => panic!("expected date prompt, got {other:?}"),
        }
        assert_eq!(session_state(&service, CHAT), Some((SessionState::Date, 0)));
    }

    #[tokio::test]
    async fn happy_path_produces_announcement() {
        let (messenger, service) = fixture();
        advance_to_pace(&service).await;
        service.handle_selection(CHAT, "Z2").await.unwrap();

        match messenger.last() {
            Sent::Photo { chat, payload, caption, keyboard } => {
                assert_eq!(chat, CHAT);
                assert_eq!(payload, PhotoPayload::Bytes(vec![1, 2, 3]));
                assert!(caption.starts_with("Announcement (March 10)"));
                assert!(caption.contains("[Bay](https://example.com/Bay) | 42 km | 500 m"));
                assert!(caption.contains("07:15 at [Velodrome](https://maps/velo)"));
                assert!(caption.contains("Pace: Z2"));
                assert!(caption.contains("by [rider](tg://user?id=7)"));
                // Channel is configured, so the post button is attached
                assert!(keyboard.is_some());
            },
            other => panic!("expected announcement photo, got {other:?}"),
        }
        // Completion clears the session
        assert_eq!(session_state(&service, CHAT), None);
    }

    #[tokio::test]
    async fn forward_steps_then_backs_return_to_initial_state() {
        let (_, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_text(CHAT, "March 10").await.unwrap();
        service.handle_selection(CHAT, "picker-save-data").await.unwrap();
        assert_eq!(session_state(&service, CHAT), Some((SessionState::TrackSelect, 2)));

        service.handle_selection(CHAT, "go-back-data").await.unwrap();
        assert_eq!(session_state(&service, CHAT), Some((SessionState::Time, 1)));

        service.handle_selection(CHAT, "go-back-data").await.unwrap();
        assert_eq!(session_state(&service, CHAT), Some((SessionState::Date, 0)));
    }

    #[tokio::test]
    async fn back_from_pace_replays_start_point_prompt_without_reloading() {
        let (messenger, service) = fixture();
        advance_to_pace(&service).await;

        let directory_prompt = messenger
            .log()
            .iter()
            .rev()
            .find_map(|sent| match sent {
                Sent::Edit { text, .. } if text.contains("Choose a starting point") => {
                    Some(text.clone())
                },
                _ => None,
            })
            .expect("directory prompt was rendered on the way forward");

        service.handle_selection(CHAT, "go-back-data").await.unwrap();

        match messenger.last() {
            Sent::Edit { text, .. } => assert_eq!(text, directory_prompt),
            other => panic!("expected replayed directory prompt, got {other:?}"),
        }
        assert_eq!(session_state(&service, CHAT), Some((SessionState::StartPointSelect, 3)));
    }

    #[tokio::test]
    async fn back_on_empty_stack_acts_as_restart() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_selection(CHAT, "go-back-data").await.unwrap();

        assert_eq!(session_state(&service, CHAT), Some((SessionState::Date, 0)));
        match messenger.last() {
            Sent::Edit { text, .. } => assert_eq!(text, "Pick a date"),
            other => panic!("expected date prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn restart_resets_to_the_date_prompt_from_any_state() {
        let (messenger, service) = fixture();
        advance_to_pace(&service).await;

        service.handle_selection(CHAT, "restart-data").await.unwrap();

        assert_eq!(session_state(&service, CHAT), Some((SessionState::Date, 0)));
        match messenger.last() {
            Sent::Edit { text, .. } => assert_eq!(text, "Pick a date"),
            other => panic!("expected date prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pagination_is_a_view_refresh_without_a_frame() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_text(CHAT, "March 10").await.unwrap();
        service.handle_selection(CHAT, "picker-save-data").await.unwrap();

        service.handle_selection(CHAT, "1").await.unwrap();

        // Page 1 of 5 routes at page_len 2 lists absolute indices 2 and 3
        match messenger.last() {
            Sent::Edit { text, .. } => {
                assert!(text.starts_with("2. [Coast]"));
                assert!(text.contains("3. [Delta]"));
            },
            other => panic!("expected page refresh, got {other:?}"),
        }
        assert_eq!(session_state(&service, CHAT), Some((SessionState::TrackSelect, 2)));
    }

    #[tokio::test]
    async fn out_of_range_page_is_ignored() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_text(CHAT, "March 10").await.unwrap();
        service.handle_selection(CHAT, "picker-save-data").await.unwrap();
        let before = messenger.count();

        service.handle_selection(CHAT, "9").await.unwrap();

        assert_eq!(messenger.count(), before);
        assert_eq!(session_state(&service, CHAT), Some((SessionState::TrackSelect, 2)));
    }

    #[tokio::test]
    async fn structurally_invalid_input_is_a_silent_noop() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_text(CHAT, "March 10").await.unwrap();
        let before = messenger.count();

        // Free text and out-of-range selections mean nothing at the time step
        service.handle_text(CHAT, "definitely not a time").await.unwrap();
        service.handle_selection(CHAT, "route-1").await.unwrap();
        service.handle_selection(CHAT, "route-99").await.unwrap();

        assert_eq!(messenger.count(), before);
        assert_eq!(session_state(&service, CHAT), Some((SessionState::Time, 1)));
    }

    #[tokio::test]
    async fn picker_defaults_come_from_settings_and_survive_back() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_text(CHAT, "March 10").await.unwrap();

        // First entry shows the configured default 10:00
        match messenger.last() {
            Sent::Text { keyboard: Some(kb), .. } => {
                assert_eq!(kb.rows[1][0].label, "10");
                assert_eq!(kb.rows[1][1].label, "00");
            },
            other => panic!("expected picker prompt, got {other:?}"),
        }

        service.handle_selection(CHAT, "picker-up-minute-data").await.unwrap();
        service.handle_selection(CHAT, "picker-save-data").await.unwrap();
        service.handle_selection(CHAT, "route-0").await.unwrap();

        // Two backs land on the time prompt again, values preserved
        service.handle_selection(CHAT, "go-back-data").await.unwrap();
        service.handle_selection(CHAT, "go-back-data").await.unwrap();

        match messenger.last() {
            Sent::Edit { keyboard: Some(kb), .. } => {
                assert_eq!(kb.rows[1][0].label, "10");
                assert_eq!(kb.rows[1][1].label, "15");
            },
            other => panic!("expected picker prompt, got {other:?}"),
        }
        assert_eq!(session_state(&service, CHAT), Some((SessionState::Time, 1)));
    }

    #[tokio::test]
    async fn no_action_token_changes_nothing() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        service.handle_text(CHAT, "March 10").await.unwrap();
        let before = messenger.count();

        service.handle_selection(CHAT, "no-action-data").await.unwrap();

        assert_eq!(messenger.count(), before);
    }

    #[tokio::test]
    async fn cancel_clears_the_session() {
        let (messenger, service) = fixture();
        advance_to_pace(&service).await;

        service.handle_cancel(CHAT).await.unwrap();
        assert_eq!(session_state(&service, CHAT), None);
        match messenger.last() {
            Sent::Text { text, .. } => assert_eq!(text, "Cancelled."),
            other => panic!("expected cancel confirmation, got {other:?}"),
        }

        // Later input has no session to act on
        let before = messenger.count();
        service.handle_text(CHAT, "March 10").await.unwrap();
        assert_eq!(messenger.count(), before);
    }

    #[tokio::test]
    async fn cancel_without_a_session_is_silent() {
        let (messenger, service) = fixture();
        service.handle_cancel(CHAT).await.unwrap();
        assert_eq!(messenger.count(), 0);
    }

    #[tokio::test]
    async fn post_to_channel_resends_the_last_announcement() {
        let (messenger, service) = fixture();
        advance_to_pace(&service).await;
        service.handle_selection(CHAT, "Z2").await.unwrap();

        service.handle_selection(CHAT, "post-to-channel-data").await.unwrap();

        match messenger.last() {
            Sent::Photo { chat, payload, caption, keyboard } => {
                assert_eq!(chat, CHANNEL);
                // The first send cached the upload handle; the channel
                // post reuses it instead of re-uploading the bytes
                assert_eq!(payload, PhotoPayload::Handle(format!("upload-{CHAT}")));
                assert!(caption.contains("Pace: Z2"));
                assert!(keyboard.is_none());
            },
            other => panic!("expected channel post, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn post_to_channel_without_a_completed_session_is_a_noop() {
        let (messenger, service) = fixture();
        service.handle_start(CHAT, "rider").await.unwrap();
        let before = messenger.count();

        service.handle_selection(CHAT, "post-to-channel-data").await.unwrap();
        assert_eq!(messenger.count(), before);
    }

    #[tokio::test]
    async fn input_without_a_session_is_ignored() {
        let (messenger, service) = fixture();
        service.handle_text(CHAT, "March 10").await.unwrap();
        service.handle_selection(CHAT, "route-0").await.unwrap();
        assert_eq!(messenger.count(), 0);
    }
}
