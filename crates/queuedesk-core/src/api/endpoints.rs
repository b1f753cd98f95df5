//! Typed wrappers for the backend routes, one call per route.
//!
//! Route spellings (including `queque`) are the backend's and must not be
//! corrected here.

use serde_json::json;

use crate::models::appointment::is_plausible_appointment_id;
use crate::models::department::MIN_DEPARTMENT_NAME_LEN;
use crate::models::{
    Appointment, AppointmentAction, AppointmentScope,
    CreatedAppointment, Department, Direction, LoginResponse, MovedQueueItem, NewAppointment,
    NewDepartment, NextQueueItem, Overview, QueueItem, QueueSummary, User,
};

use super::{ApiClient, ApiError, HttpMethod, RequestOptions};

/// Append `?k=v&...` for the present parameters, percent-encoding values.
fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

fn segment(id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::InvalidRequest("id must not be empty".to_string()));
    }
    Ok(urlencoding::encode(id).into_owned())
}

impl ApiClient {
    // ===== Auth =====

    /// `POST /auth/login`, sent without the session credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let options = RequestOptions::with_method(HttpMethod::Post)
            .json(&json!({ "email": email, "password": password }))?
            .without_auth();
        self.request("/auth/login", options).await
    }

    /// `GET /auth/me`: the profile behind the current credential.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.request("/auth/me", RequestOptions::get()).await
    }

    // ===== Appointments =====

    pub async fn create_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<CreatedAppointment, ApiError> {
        let options = RequestOptions::with_method(HttpMethod::Post).json(appointment)?;
        self.request("/appointments/create-appointment", options).await
    }

    pub async fn my_appointments(
        &self,
        scope: Option<AppointmentScope>,
    ) -> Result<Vec<Appointment>, ApiError> {
        let path = with_query(
            "/appointments/my-appointments",
            &[("type", scope.map(|s| s.as_query()))],
        );
        self.request(&path, RequestOptions::get()).await
    }

    pub async fn complete_appointment(&self, id: &str) -> Result<AppointmentAction, ApiError> {
        self.appointment_action(id, "complete").await
    }

    pub async fn cancel_appointment(&self, id: &str) -> Result<AppointmentAction, ApiError> {
        self.appointment_action(id, "cancel").await
    }

    async fn appointment_action(&self, id: &str, action: &str) -> Result<AppointmentAction, ApiError> {
        if !is_plausible_appointment_id(id) {
            return Err(ApiError::InvalidRequest(format!(
                "appointment id looks too short: {:?}",
                id
            )));
        }
        let path = format!("/appointments/{}/{}", segment(id)?, action);
        self.request(&path, RequestOptions::with_method(HttpMethod::Patch))
            .await
    }

    // ===== Departments =====

    pub async fn list_departments(&self, hospital_id: Option<&str>) -> Result<Vec<Department>, ApiError> {
        let path = with_query("/departments/get-departments", &[("hospitalId", hospital_id)]);
        self.request(&path, RequestOptions::get()).await
    }

    pub async fn create_department(&self, name: &str, hospital_id: &str) -> Result<Department, ApiError> {
        let body = NewDepartment::new(name, hospital_id).ok_or_else(|| {
            ApiError::InvalidRequest(format!(
                "department name must be at least {} characters and a hospital id is required",
                MIN_DEPARTMENT_NAME_LEN
            ))
        })?;
        let options = RequestOptions::with_method(HttpMethod::Post).json(&body)?;
        self.request("/departments/create-department", options).await
    }

    // ===== Queue =====

    /// A department's queue as the backend returns it (unsorted).
    pub async fn list_queue(&self, department_id: &str, date: Option<&str>) -> Result<Vec<QueueItem>, ApiError> {
        if department_id.trim().is_empty() {
            return Err(ApiError::InvalidRequest("department id is required".to_string()));
        }
        let path = with_query(
            "/queque/get-queque",
            &[("departmentId", Some(department_id.trim())), ("date", date)],
        );
        self.request(&path, RequestOptions::get()).await
    }

    /// Call the next patient in a department's queue.
    pub async fn next_in_queue(&self, department_id: &str, date: Option<&str>) -> Result<NextQueueItem, ApiError> {
        if department_id.trim().is_empty() {
            return Err(ApiError::InvalidRequest("department id is required".to_string()));
        }
        let mut body = json!({ "departmentId": department_id.trim() });
        if let Some(date) = date.filter(|d| !d.is_empty()) {
            body["date"] = json!(date);
        }
        let options = RequestOptions::with_method(HttpMethod::Post).json(&body)?;
        self.request("/queque/next", options).await
    }

    /// Move a queue item one position up or down.
    pub async fn move_in_queue(&self, id: &str, direction: Direction) -> Result<MovedQueueItem, ApiError> {
        let path = format!("/queque/{}/move", segment(id)?);
        let options = RequestOptions::with_method(HttpMethod::Patch)
            .json(&json!({ "direction": direction }))?;
        self.request(&path, options).await
    }

    // ===== Composite views =====

    /// Departments plus the queue of `department_id`, or of the first
    /// department when none is given. With a known department both lists
    /// are fetched concurrently.
    pub async fn fetch_overview(
        &self,
        hospital_id: Option<&str>,
        department_id: Option<&str>,
        date: Option<&str>,
    ) -> Result<Overview, ApiError> {
        if let Some(department_id) = department_id {
            let (departments, queue) = futures::try_join!(
                self.list_departments(hospital_id),
                self.list_queue(department_id, date),
            )?;
            let department = departments.iter().find(|d| d.id == department_id).cloned();
            return Ok(Overview {
                departments,
                department,
                queue: QueueSummary::from_items(queue),
            });
        }

        let departments = self.list_departments(hospital_id).await?;
        let Some(first) = departments.first().cloned() else {
            return Ok(Overview {
                departments,
                ..Overview::default()
            });
        };
        let queue = self.list_queue(&first.id, date).await?;
        Ok(Overview {
            departments,
            department: Some(first),
            queue: QueueSummary::from_items(queue),
        })
    }
}
