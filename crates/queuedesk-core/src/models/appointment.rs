//! Appointment payloads and the responses to appointment actions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::queue::QueueStatus;

/// Minimum length of an appointment id accepted before calling the backend.
pub const MIN_APPOINTMENT_ID_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Waiting,
    Done,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Waiting => "WAITING",
            AppointmentStatus::Done => "DONE",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub department_id: String,
    pub patient_id: String,
}

/// Which slice of the caller's appointments to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    Past,
    Upcoming,
}

impl AppointmentScope {
    pub fn as_query(&self) -> &'static str {
        match self {
            AppointmentScope::Past => "past",
            AppointmentScope::Upcoming => "upcoming",
        }
    }
}

/// Request body for `/appointments/create-appointment`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub department_id: String,
    pub hospital_id: String,
    pub date: String,
    pub time: String,
}

/// Response to complete/cancel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AppointmentAction {
    pub message: String,
    pub appointment_id: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct QueuePlacement {
    pub position: i32,
    pub status: QueueStatus,
}

/// Response to a booking: the appointment and where it landed in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CreatedAppointment {
    pub appointment_id: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub queue: QueuePlacement,
}

/// Cheap sanity check on an operator-typed appointment id.
pub fn is_plausible_appointment_id(id: &str) -> bool {
    id.trim().len() >= MIN_APPOINTMENT_ID_LEN
}
