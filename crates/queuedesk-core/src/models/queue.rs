//! Queue items and the summary the queue screens are built from.
//!
//! Ordering and status transitions are owned by the backend; the client
//! only sorts by the backend-assigned position for display.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    Waiting,
    Active,
    Done,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueueStatus::Waiting => "WAITING",
            QueueStatus::Active => "ACTIVE",
            QueueStatus::Done => "DONE",
            QueueStatus::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Direction for a one-step queue move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: String,
    pub appointment_id: String,
    pub position: i32,
    pub status: QueueStatus,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

/// Response to `/queque/next`: the item that just became active.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct NextQueueItem {
    pub appointment_id: String,
    pub position: i32,
    pub status: QueueStatus,
}

/// Response to `/queque/{id}/move`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MovedQueueItem {
    pub id: String,
    pub position: i32,
    pub status: QueueStatus,
}

/// A department's queue for one date, ordered by position.
#[derive(Debug, Clone, Default)]
pub struct QueueSummary {
    pub items: Vec<QueueItem>,
}

impl QueueSummary {
    pub fn from_items(mut items: Vec<QueueItem>) -> Self {
        items.sort_by_key(|item| item.position);
        Self { items }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == QueueStatus::Waiting)
            .count()
    }

    /// The patient currently being served, if any.
    pub fn active(&self) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.status == QueueStatus::Active)
    }

    pub fn preview(&self, limit: usize) -> &[QueueItem] {
        &self.items[..self.items.len().min(limit)]
    }

    /// "Total: 5 • Waiting: 3 • Active: #2"
    pub fn headline(&self) -> String {
        let active = self
            .active()
            .map(|item| format!("#{}", item.position))
            .unwrap_or_else(|| "—".to_string());
        format!(
            "Total: {} • Waiting: {} • Active: {}",
            self.total(),
            self.waiting_count(),
            active
        )
    }
}
