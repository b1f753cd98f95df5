//! Data models for the hospital queue backend.
//!
//! This module contains the payloads exchanged with the backend:
//!
//! - `User`, `Role`: the signed-in operator's profile
//! - `Department`: hospital service lines
//! - `Appointment` and the appointment action responses
//! - `QueueItem`, `QueueSummary`: a department's service line for a date
//! - `Overview`: the dashboard landing view, assembled from several calls

pub mod appointment;
pub mod department;
pub mod overview;
pub mod queue;
pub mod user;

pub use appointment::{
    Appointment, AppointmentAction, AppointmentScope, AppointmentStatus, CreatedAppointment,
    NewAppointment, QueuePlacement,
};
pub use department::{Department, NewDepartment};
pub use overview::Overview;
pub use queue::{Direction, MovedQueueItem, NextQueueItem, QueueItem, QueueStatus, QueueSummary};
pub use user::{LoginResponse, LoginUser, Role, User};
