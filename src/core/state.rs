//! Application state and its message reducer
//!
//! All mutable state of a session lives in [`AppState`] and only changes
//! through [`update`]. Side effects (probing, downloading) are returned as
//! [`Command`]s for the caller to run; their results come back as messages.

use crate::core::queue::{DownloadQueue, QueueEntry, QueueMessage};
use crate::core::thumbnail::{Availability, ThumbnailSet, ThumbnailTier};
use crate::error::ThumbError;
use crate::utils::{parse_video_id, thumbnail_filename};
use tracing::debug;

/// Error shown to the user after a failed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub code: &'static str,
    pub message: String,
}

impl From<&ThumbError> for FetchError {
    fn from(err: &ThumbError) -> Self {
        let message = match err {
            ThumbError::UnrecognizedUrl(_) => {
                "The provided URL signature does not match any recognized YouTube patterns."
                    .to_string()
            }
            other => other.to_string(),
        };
        Self {
            code: err.code(),
            message,
        }
    }
}

/// Verification state of the current thumbnail set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Probes are in flight; no tier is selectable
    Pending,
    Done(Availability),
}

/// Everything the session knows
#[derive(Debug, Clone)]
pub struct AppState {
    pub input: String,
    pub thumbnails: Option<ThumbnailSet>,
    pub verification: Option<Verification>,
    pub selected: Option<ThumbnailTier>,
    pub error: Option<FetchError>,
    pub queue: DownloadQueue,
    thumbnail_host: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            thumbnails: None,
            verification: None,
            selected: None,
            error: None,
            queue: DownloadQueue::new(),
            thumbnail_host: None,
        }
    }

    /// Derive thumbnail URLs against another host
    pub fn with_thumbnail_host(mut self, host: impl Into<String>) -> Self {
        self.thumbnail_host = Some(host.into());
        self
    }

    /// Check if verification is still running
    pub fn is_verifying(&self) -> bool {
        matches!(self.verification, Some(Verification::Pending))
    }

    /// Availability once verification finished
    pub fn availability(&self) -> Option<Availability> {
        match self.verification {
            Some(Verification::Done(availability)) => Some(availability),
            _ => None,
        }
    }

    /// Check if a tier may be selected right now
    pub fn is_selectable(&self, tier: ThumbnailTier) -> bool {
        self.availability()
            .map(|availability| availability.is_available(tier))
            .unwrap_or(false)
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    InputChanged(String),
    Fetch,
    Verified(Availability),
    SelectTier(ThumbnailTier),
    /// Download the selected tier
    RequestDownload,
    Queue(QueueMessage),
}

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Probe every tier of the set, answer with [`Message::Verified`]
    Verify(ThumbnailSet),
    /// Download `url` as `file_name`, answer with [`Message::Queue`]
    Download {
        id: String,
        url: String,
        file_name: String,
    },
}

/// Apply a message to the state
pub fn update(state: &mut AppState, message: Message) -> Option<Command> {
    match message {
        Message::InputChanged(input) => {
            state.input = input;
            None
        }
        Message::Fetch => fetch(state),
        Message::Verified(availability) => {
            if state.thumbnails.is_none() {
                return None;
            }
            state.verification = Some(Verification::Done(availability));
            state.selected = Some(availability.default_tier());
            None
        }
        Message::SelectTier(tier) => {
            if state.is_selectable(tier) {
                state.selected = Some(tier);
            } else {
                debug!("Ignoring selection of unavailable tier {}", tier);
            }
            None
        }
        Message::RequestDownload => request_download(state),
        Message::Queue(message) => {
            state.queue.apply(message);
            None
        }
    }
}

fn fetch(state: &mut AppState) -> Option<Command> {
    state.error = None;
    state.thumbnails = None;
    state.verification = None;
    state.selected = None;

    let video_id = match parse_video_id(&state.input) {
        Ok(video_id) => video_id,
        Err(e) => {
            state.error = Some(FetchError::from(&e));
            return None;
        }
    };

    let set = match &state.thumbnail_host {
        Some(host) => ThumbnailSet::with_host(host, &video_id),
        None => ThumbnailSet::new(&video_id),
    };

    state.thumbnails = Some(set.clone());
    state.verification = Some(Verification::Pending);
    Some(Command::Verify(set))
}

fn request_download(state: &mut AppState) -> Option<Command> {
    if state.is_verifying() {
        return None;
    }
    let set = state.thumbnails.as_ref()?;
    let tier = state.selected?;

    let entry = QueueEntry::new(set.video_id(), tier);
    let command = Command::Download {
        id: entry.id.clone(),
        url: set.url(tier).to_string(),
        file_name: thumbnail_filename(set.video_id(), tier),
    };
    state.queue.apply(QueueMessage::Enqueued(entry));
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::Progress;
    use crate::core::queue::DownloadStatus;

    fn fetched(url: &str) -> (AppState, Option<Command>) {
        let mut state = AppState::new();
        update(&mut state, Message::InputChanged(url.to_string()));
        let command = update(&mut state, Message::Fetch);
        (state, command)
    }

    #[test]
    fn test_fetch_empty_input() {
        let (state, command) = fetched("   ");
        assert!(command.is_none());
        assert_eq!(state.error.as_ref().unwrap().code, "EMPTY_SIGNAL");
        assert!(state.thumbnails.is_none());
    }

    #[test]
    fn test_fetch_unrecognized_url() {
        let (state, command) = fetched("https://example.com/video");
        assert!(command.is_none());
        let error = state.error.unwrap();
        assert_eq!(error.code, "PROTOCOL_ERROR");
        assert!(error.message.contains("recognized YouTube patterns"));
    }

    #[test]
    fn test_fetch_starts_verification() {
        let (state, command) = fetched("https://youtu.be/dQw4w9WgXcQ");

        assert_eq!(command, Some(Command::Verify(ThumbnailSet::new("dQw4w9WgXcQ"))));
        assert!(state.error.is_none());
        assert!(state.is_verifying());
        assert!(state.selected.is_none());
        for tier in ThumbnailTier::ALL {
            assert!(!state.is_selectable(tier));
        }
    }

    #[test]
    fn test_fetch_with_custom_host() {
        let mut state = AppState::new().with_thumbnail_host("http://localhost:1");
        update(&mut state, Message::InputChanged("https://youtu.be/dQw4w9WgXcQ".to_string()));
        let command = update(&mut state, Message::Fetch);

        assert_eq!(
            command,
            Some(Command::Verify(ThumbnailSet::with_host("http://localhost:1", "dQw4w9WgXcQ")))
        );
    }

    #[test]
    fn test_download_blocked_while_verifying() {
        let (mut state, _) = fetched("https://youtu.be/dQw4w9WgXcQ");
        assert!(update(&mut state, Message::RequestDownload).is_none());
        assert!(state.queue.is_empty());
    }

    #[test]
    fn test_verified_selects_default_tier() {
        let (mut state, _) = fetched("https://youtu.be/dQw4w9WgXcQ");
        update(&mut state, Message::Verified(Availability::all()));
        assert_eq!(state.selected, Some(ThumbnailTier::MaxRes));

        let (mut state, _) = fetched("https://youtu.be/dQw4w9WgXcQ");
        update(
            &mut state,
            Message::Verified(Availability::from_results([false, true, true, true])),
        );
        assert_eq!(state.selected, Some(ThumbnailTier::High));
        assert!(!state.is_selectable(ThumbnailTier::MaxRes));
    }

    #[test]
    fn test_select_unavailable_tier_is_ignored() {
        let (mut state, _) = fetched("https://youtu.be/dQw4w9WgXcQ");
        update(
            &mut state,
            Message::Verified(Availability::from_results([false, true, true, false])),
        );

        update(&mut state, Message::SelectTier(ThumbnailTier::Standard));
        assert_eq!(state.selected, Some(ThumbnailTier::High));

        update(&mut state, Message::SelectTier(ThumbnailTier::Medium));
        assert_eq!(state.selected, Some(ThumbnailTier::Medium));
    }

    #[test]
    fn test_request_download_enqueues_entry() {
        let (mut state, _) = fetched("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        update(&mut state, Message::Verified(Availability::all()));

        let Some(Command::Download { id, url, file_name }) =
            update(&mut state, Message::RequestDownload)
        else {
            panic!("expected a download command");
        };

        assert_eq!(url, "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg");
        assert_eq!(file_name, "cyberthum-dQw4w9WgXcQ-maxRes.jpg");

        let entry = state.queue.get(&id).unwrap();
        assert_eq!(entry.status, DownloadStatus::Pending);
        assert_eq!(entry.tier, ThumbnailTier::MaxRes);
    }

    #[test]
    fn test_queue_messages_flow_through_update() {
        let (mut state, _) = fetched("https://youtu.be/dQw4w9WgXcQ");
        update(&mut state, Message::Verified(Availability::all()));
        let Some(Command::Download { id, .. }) = update(&mut state, Message::RequestDownload)
        else {
            panic!("expected a download command");
        };

        update(
            &mut state,
            Message::Queue(QueueMessage::Progress {
                id: id.clone(),
                percent: 30.0,
            }),
        );
        assert_eq!(state.queue.get(&id).unwrap().status, DownloadStatus::Downloading);

        update(
            &mut state,
            Message::Queue(QueueMessage::Progress {
                id: id.clone(),
                percent: Progress::FAILED,
            }),
        );
        assert_eq!(state.queue.get(&id).unwrap().status, DownloadStatus::Failed);
    }

    #[test]
    fn test_refetch_resets_previous_result() {
        let (mut state, _) = fetched("https://youtu.be/dQw4w9WgXcQ");
        update(&mut state, Message::Verified(Availability::all()));

        update(&mut state, Message::InputChanged(String::new()));
        update(&mut state, Message::Fetch);

        assert!(state.thumbnails.is_none());
        assert!(state.selected.is_none());
        assert!(state.verification.is_none());
        assert_eq!(state.error.unwrap().code, "EMPTY_SIGNAL");
    }
}
