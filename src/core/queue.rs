//! Bounded queue of recent downloads

use crate::core::progress::Progress;
use crate::core::thumbnail::ThumbnailTier;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

/// Number of downloads kept in the queue
pub const MAX_QUEUE_LEN: usize = 5;

const DOWNLOAD_ID_LEN: usize = 9;

/// Status of a queued download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Downloading,
    Completed,
    Failed,
}

impl DownloadStatus {
    /// Completed and failed entries never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadStatus::Completed | DownloadStatus::Failed)
    }
}

/// One download tracked by the queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub id: String,
    pub video_id: String,
    pub tier: ThumbnailTier,
    /// Last reported percent, 0..=100
    pub progress: u8,
    pub status: DownloadStatus,
}

impl QueueEntry {
    /// Create a pending entry with a fresh random id
    pub fn new(video_id: impl Into<String>, tier: ThumbnailTier) -> Self {
        Self {
            id: new_download_id(),
            video_id: video_id.into(),
            tier,
            progress: 0,
            status: DownloadStatus::Pending,
        }
    }
}

/// Generate a random lowercase alphanumeric download id
pub fn new_download_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOWNLOAD_ID_LEN)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

/// Updates applied to the queue
#[derive(Debug, Clone, PartialEq)]
pub enum QueueMessage {
    /// A download was started
    Enqueued(QueueEntry),
    /// A progress value was reported for a download
    Progress { id: String, percent: f64 },
    /// A download call returned an error
    Failed { id: String },
    /// Drop every entry
    Clear,
}

/// The five most recent downloads, newest first
#[derive(Debug, Clone, Default)]
pub struct DownloadQueue {
    entries: VecDeque<QueueEntry>,
}

impl DownloadQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one message
    pub fn apply(&mut self, message: QueueMessage) {
        match message {
            QueueMessage::Enqueued(entry) => self.push(entry),
            QueueMessage::Progress { id, percent } => self.on_progress(&id, percent),
            QueueMessage::Failed { id } => self.on_failed(&id),
            QueueMessage::Clear => self.entries.clear(),
        }
    }

    /// Add an entry, evicting the oldest beyond [`MAX_QUEUE_LEN`]
    pub fn push(&mut self, entry: QueueEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > MAX_QUEUE_LEN {
            if let Some(evicted) = self.entries.pop_back() {
                debug!("Evicted download {} from queue", evicted.id);
            }
        }
    }

    fn on_progress(&mut self, id: &str, percent: f64) {
        let Some(entry) = self.get_mut(id) else {
            debug!("Discarding progress for evicted download {}", id);
            return;
        };
        if entry.status.is_terminal() {
            return;
        }

        if percent < 0.0 {
            // Keep the last recorded progress on failure
            entry.status = DownloadStatus::Failed;
        } else if percent >= 100.0 {
            entry.progress = 100;
            entry.status = DownloadStatus::Completed;
        } else {
            entry.progress = percent.round().clamp(0.0, 100.0) as u8;
            entry.status = DownloadStatus::Downloading;
        }
    }

    fn on_failed(&mut self, id: &str) {
        if let Some(entry) = self.get_mut(id) {
            if !entry.status.is_terminal() {
                entry.status = DownloadStatus::Failed;
            }
        }
    }

    /// Look up an entry by download id
    pub fn get(&self, id: &str) -> Option<&QueueEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut QueueEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if every entry reached a terminal status
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|entry| entry.status.is_terminal())
    }

    /// Number of failed entries
    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == DownloadStatus::Failed)
            .count()
    }
}

impl QueueMessage {
    /// Build a progress message from a snapshot
    pub fn from_progress(id: &str, progress: &Progress) -> Self {
        QueueMessage::Progress {
            id: id.to_string(),
            percent: progress.percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(video_id: &str) -> QueueEntry {
        QueueEntry::new(video_id, ThumbnailTier::MaxRes)
    }

    fn progress(id: &str, percent: f64) -> QueueMessage {
        QueueMessage::Progress {
            id: id.to_string(),
            percent,
        }
    }

    #[test]
    fn test_new_download_id() {
        let id = new_download_id();
        assert_eq!(id.len(), 9);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_ne!(new_download_id(), new_download_id());
    }

    #[test]
    fn test_queue_entry_starts_pending() {
        let entry = entry("dQw4w9WgXcQ");
        assert_eq!(entry.status, DownloadStatus::Pending);
        assert_eq!(entry.progress, 0);
    }

    #[test]
    fn test_queue_caps_at_five_newest_first() {
        let mut queue = DownloadQueue::new();
        let entries: Vec<QueueEntry> = (0..6).map(|i| entry(&format!("video{i:06}"))).collect();

        for e in entries.iter().take(5) {
            queue.apply(QueueMessage::Enqueued(e.clone()));
        }
        assert_eq!(queue.len(), 5);

        queue.apply(QueueMessage::Enqueued(entries[5].clone()));
        assert_eq!(queue.len(), MAX_QUEUE_LEN);
        assert!(queue.get(&entries[0].id).is_none());
        assert_eq!(queue.iter().next().unwrap().id, entries[5].id);
    }

    #[test]
    fn test_queue_evicts_oldest_regardless_of_status() {
        let mut queue = DownloadQueue::new();
        let oldest = entry("oldest00000");
        queue.push(oldest.clone());
        queue.apply(progress(&oldest.id, 50.0));

        for i in 0..5 {
            queue.push(entry(&format!("video{i:06}")));
        }

        assert!(queue.get(&oldest.id).is_none());
    }

    #[test]
    fn test_status_transitions_to_completed() {
        let mut queue = DownloadQueue::new();
        let e = entry("dQw4w9WgXcQ");
        queue.push(e.clone());

        queue.apply(progress(&e.id, 10.0));
        assert_eq!(queue.get(&e.id).unwrap().status, DownloadStatus::Downloading);
        assert_eq!(queue.get(&e.id).unwrap().progress, 10);

        queue.apply(progress(&e.id, 62.4));
        assert_eq!(queue.get(&e.id).unwrap().progress, 62);

        queue.apply(progress(&e.id, 100.0));
        let done = queue.get(&e.id).unwrap();
        assert_eq!(done.status, DownloadStatus::Completed);
        assert_eq!(done.progress, 100);
    }

    #[test]
    fn test_failure_sentinel_keeps_last_progress() {
        let mut queue = DownloadQueue::new();
        let e = entry("dQw4w9WgXcQ");
        queue.push(e.clone());

        queue.apply(progress(&e.id, 30.0));
        queue.apply(progress(&e.id, Progress::FAILED));

        let failed = queue.get(&e.id).unwrap();
        assert_eq!(failed.status, DownloadStatus::Failed);
        assert_eq!(failed.progress, 30);
    }

    #[test]
    fn test_terminal_states_do_not_change() {
        let mut queue = DownloadQueue::new();
        let done = entry("done0000000");
        let failed = entry("failed00000");
        queue.push(done.clone());
        queue.push(failed.clone());

        queue.apply(progress(&done.id, 100.0));
        queue.apply(QueueMessage::Failed { id: failed.id.clone() });

        queue.apply(progress(&done.id, Progress::FAILED));
        queue.apply(QueueMessage::Failed { id: done.id.clone() });
        queue.apply(progress(&failed.id, 100.0));

        assert_eq!(queue.get(&done.id).unwrap().status, DownloadStatus::Completed);
        assert_eq!(queue.get(&failed.id).unwrap().status, DownloadStatus::Failed);
        assert!(queue.is_settled());
        assert_eq!(queue.failed_count(), 1);
    }

    #[test]
    fn test_failure_does_not_touch_other_entries() {
        let mut queue = DownloadQueue::new();
        let a = entry("aaaaaaaaaaa");
        let b = entry("bbbbbbbbbbb");
        queue.push(a.clone());
        queue.push(b.clone());
        queue.apply(progress(&a.id, 60.0));

        queue.apply(progress(&b.id, Progress::FAILED));

        let a_now = queue.get(&a.id).unwrap();
        assert_eq!(a_now.status, DownloadStatus::Downloading);
        assert_eq!(a_now.progress, 60);
        assert_eq!(queue.get(&b.id).unwrap().status, DownloadStatus::Failed);
    }

    #[test]
    fn test_orphaned_updates_are_discarded() {
        let mut queue = DownloadQueue::new();
        queue.push(entry("dQw4w9WgXcQ"));

        queue.apply(progress("unknown", 50.0));
        queue.apply(QueueMessage::Failed { id: "unknown".to_string() });

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().unwrap().status, DownloadStatus::Pending);
    }

    #[test]
    fn test_clear() {
        let mut queue = DownloadQueue::new();
        queue.push(entry("dQw4w9WgXcQ"));
        queue.apply(QueueMessage::Clear);
        assert!(queue.is_empty());
    }
}
