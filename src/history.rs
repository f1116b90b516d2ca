//! Preview history: append-only, newest-first log of preview outcomes.
//!
//! Every preview attempt produces exactly one entry, including failures.
//! Entries are never edited or removed.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};
use uuid::Uuid;

use crate::briefing::{Meeting, ParticipantMap};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Outcome of a preview as shown in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Sent,
    /// Part of the stored wire format; nothing in this crate records it.
    Draft,
    Failed,
}

impl std::fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::Draft => write!(f, "draft"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One recorded preview attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub meeting_count: usize,
    pub participant_count: usize,
    pub status: HistoryStatus,
    /// Email text on success, `Error: <message>` on failure.
    pub content: String,
}

/// What a preview attempt produced.
#[derive(Debug, Clone)]
pub enum PreviewOutcome {
    Success {
        meetings: Vec<Meeting>,
        participants: ParticipantMap,
        email_content: String,
    },
    Failure {
        error_message: String,
    },
}

impl PreviewOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error_message: message.into(),
        }
    }
}

impl HistoryEntry {
    /// Build the entry for an outcome, stamped now.
    pub fn from_outcome(outcome: &PreviewOutcome) -> Self {
        let (meeting_count, participant_count, status, content) = match outcome {
            PreviewOutcome::Success {
                meetings,
                participants,
                email_content,
            } => (
                meetings.len(),
                participants.len(),
                HistoryStatus::Sent,
                email_content.clone(),
            ),
            PreviewOutcome::Failure { error_message } => {
                (0, 0, HistoryStatus::Failed, format!("Error: {error_message}"))
            }
        };

        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            meeting_count,
            participant_count,
            status,
            content,
        }
    }
}

/// In-memory history with a broadcast channel for live listeners.
pub struct HistoryLog {
    entries: RwLock<VecDeque<HistoryEntry>>,
    tx: broadcast::Sender<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            entries: RwLock::new(VecDeque::new()),
            tx,
        })
    }

    /// Subscribe to entries as they are recorded.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEntry> {
        self.tx.subscribe()
    }

    /// Record an outcome and return the new entry.
    pub async fn record(&self, outcome: &PreviewOutcome) -> HistoryEntry {
        let entry = HistoryEntry::from_outcome(outcome);

        match entry.status {
            HistoryStatus::Failed => warn!(
                entry_id = %entry.id,
                content = %entry.content,
                "Failed preview recorded"
            ),
            _ => info!(
                entry_id = %entry.id,
                meetings = entry.meeting_count,
                participants = entry.participant_count,
                status = %entry.status,
                "Preview recorded"
            ),
        }

        {
            let mut entries = self.entries.write().await;
            entries.push_front(entry.clone());
        }

        // ok if nobody is listening
        let _ = self.tx.send(entry.clone());
        entry
    }

    /// All entries, newest first.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn latest(&self) -> Option<HistoryEntry> {
        self.entries.read().await.front().cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
