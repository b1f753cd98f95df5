//! Landing view: department count plus a queue snapshot.

use super::{Department, QueueSummary};

/// Number of queue rows shown on the overview.
pub const OVERVIEW_PREVIEW_LEN: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct Overview {
    pub departments: Vec<Department>,
    /// Department the queue snapshot belongs to.
    pub department: Option<Department>,
    pub queue: QueueSummary,
}

impl Overview {
    pub fn departments_count(&self) -> usize {
        self.departments.len()
    }

    /// The queue length stands in for "appointments handled today".
    pub fn todays_appointments(&self) -> usize {
        self.queue.total()
    }

    pub fn preview(&self) -> &[super::QueueItem] {
        self.queue.preview(OVERVIEW_PREVIEW_LEN)
    }
}
