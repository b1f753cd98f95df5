// Shared by several test binaries; not every helper is used by each
#![allow(dead_code)]

//! In-process stand-in for the queue backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{Barrier, Notify};

use queuedesk_core::api::ApiClient;
use queuedesk_core::auth::SessionStore;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const PATIENT_TOKEN: &str = "abc";
/// Issued without a user in the login payload; `/auth/me` says PATIENT.
pub const SNEAKY_TOKEN: &str = "sneaky-token";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct MockState {
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    /// Moves of ids starting with `sync-` wait here until two have arrived.
    pub move_barrier: Arc<Barrier>,
    /// `/slow` signals `arrived` and then waits for `release`.
    pub arrived: Arc<Notify>,
    pub release: Arc<Notify>,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: MockState,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            move_barrier: Arc::new(Barrier::new(2)),
            arrived: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self, session: Arc<SessionStore>) -> ApiClient {
        ApiClient::new(self.base_url.clone(), session).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Last recorded request whose path (without query) equals `path`.
    pub fn last_request(&self, path: &str) -> Recorded {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.path.split('?').next() == Some(path))
            .unwrap_or_else(|| panic!("no request recorded for {}", path))
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/echo", get(echo).post(echo).put(echo).delete(echo))
        .route("/plain-error", get(plain_error))
        .route("/json-error", get(json_error))
        .route("/json-error-no-message", get(json_error_no_message))
        .route("/broken-json-error", get(broken_json_error))
        .route("/expired", get(expired))
        .route("/no-content", get(no_content))
        .route("/wrong-shape", get(wrong_shape))
        .route("/slow", get(slow))
        .route("/departments/get-departments", get(list_departments))
        .route("/departments/create-department", post(create_department))
        .route("/queque/get-queque", get(list_queue))
        .route("/queque/next", post(next_in_queue))
        .route("/queque/{id}/move", patch(move_in_queue))
        .route("/appointments/{id}/complete", patch(complete_appointment))
        .route("/appointments/{id}/cancel", patch(cancel_appointment))
        .route("/appointments/my-appointments", get(my_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<MockState>, req: Request, next: Next) -> Response {
    let recorded = {
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Recorded {
            method: req.method().to_string(),
            path: req
                .uri()
                .path_and_query()
                .map(|pq| pq.to_string())
                .unwrap_or_default(),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    state.requests.lock().unwrap().push(recorded);
    next.run(req).await
}

fn user(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": format!("User {}", id),
        "email": format!("{}@hospital.com", id),
        "role": role,
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }
    match email {
        "admin@hospital.com" => Json(json!({ "token": ADMIN_TOKEN, "user": user("admin", "ADMIN") })).into_response(),
        // The payload user carries only the role
        "patient@hospital.com" => Json(json!({ "token": PATIENT_TOKEN, "user": { "role": "PATIENT" } })).into_response(),
        "sneaky@hospital.com" => Json(json!({ "token": SNEAKY_TOKEN })).into_response(),
        "notoken@hospital.com" => Json(json!({ "user": user("admin", "ADMIN") })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response(),
    }
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(ADMIN_TOKEN) => Json(user("admin", "ADMIN")).into_response(),
        Some(SNEAKY_TOKEN) => Json(user("sneaky", "PATIENT")).into_response(),
        _ => unauthorized(),
    }
}

async fn echo(headers: HeaderMap) -> Json<Value> {
    Json(json!({ "authorization": bearer(&headers) }))
}

async fn plain_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn json_error() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Department name is required" })),
    )
        .into_response()
}

async fn json_error_no_message() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "errors": ["name"] })),
    )
        .into_response()
}

async fn broken_json_error() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        [(header::CONTENT_TYPE, "application/json")],
        "{oops",
    )
        .into_response()
}

async fn expired() -> Response {
    StatusCode::UNAUTHORIZED.into_response()
}

async fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

async fn wrong_shape() -> Json<Value> {
    Json(json!({ "unexpected": true }))
}

async fn slow(State(state): State<MockState>) -> Json<Value> {
    state.arrived.notify_one();
    state.release.notified().await;
    Json(json!({ "ok": true }))
}

#[derive(Deserialize)]
struct DepartmentQuery {
    #[serde(rename = "hospitalId")]
    hospital_id: Option<String>,
}

async fn list_departments(headers: HeaderMap, Query(query): Query<DepartmentQuery>) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return unauthorized();
    }
    let hospital = query.hospital_id.unwrap_or_else(|| "h-1".to_string());
    Json(json!([
        { "id": "dep-ent", "name": "ENT", "hospitalId": hospital },
        { "id": "dep-card", "name": "Cardiology", "hospitalId": hospital },
    ]))
    .into_response()
}

async fn create_department(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return unauthorized();
    }
    let name = body["name"].as_str().unwrap_or_default();
    if name == "Cardiology" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Department already exists" })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": "dep-new", "name": name, "hospitalId": body["hospitalId"] })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct QueueQuery {
    #[serde(rename = "departmentId")]
    department_id: String,
    date: Option<String>,
}

async fn list_queue(headers: HeaderMap, Query(query): Query<QueueQuery>) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return unauthorized();
    }
    if query.department_id != "dep-ent" {
        return Json(json!([])).into_response();
    }
    let created = match query.date.as_deref() {
        Some(date) => format!("{}T08:00:00.000Z", date),
        None => "2026-10-18T08:00:00.000Z".to_string(),
    };
    Json(json!([
        { "id": "q3", "appointmentId": "apt-003", "position": 3, "status": "WAITING", "createdAt": created },
        { "id": "q1", "appointmentId": "apt-001", "position": 1, "status": "DONE", "createdAt": created },
        { "id": "q2", "appointmentId": "apt-002", "position": 2, "status": "ACTIVE", "createdAt": created },
    ]))
    .into_response()
}

async fn next_in_queue(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return unauthorized();
    }
    if body["departmentId"] != "dep-ent" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No waiting patients" })),
        )
            .into_response();
    }
    Json(json!({ "appointmentId": "apt-003", "position": 3, "status": "ACTIVE" })).into_response()
}

async fn move_in_queue(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return unauthorized();
    }
    if id.starts_with("sync-") {
        state.move_barrier.wait().await;
    }
    let position = match body["direction"].as_str() {
        Some("UP") => 1,
        Some("DOWN") => 3,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "direction must be UP or DOWN" })),
            )
                .into_response()
        }
    };
    Json(json!({ "id": id, "position": position, "status": "WAITING" })).into_response()
}

async fn complete_appointment(headers: HeaderMap, Path(id): Path<String>) -> Response {
    appointment_action(&headers, id, "Appointment completed", "DONE")
}

async fn cancel_appointment(headers: HeaderMap, Path(id): Path<String>) -> Response {
    appointment_action(&headers, id, "Appointment cancelled", "CANCELLED")
}

fn appointment_action(headers: &HeaderMap, id: String, message: &str, status: &str) -> Response {
    if bearer(headers) != Some(ADMIN_TOKEN) {
        return unauthorized();
    }
    if id == "apt-missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Appointment not found" })),
        )
            .into_response();
    }
    Json(json!({ "message": message, "appointmentId": id, "status": status })).into_response()
}

#[derive(Deserialize)]
struct AppointmentsQuery {
    #[serde(rename = "type")]
    scope: Option<String>,
}

async fn my_appointments(headers: HeaderMap, Query(query): Query<AppointmentsQuery>) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return unauthorized();
    }
    let status = match query.scope.as_deref() {
        Some("past") => "DONE",
        _ => "PENDING",
    };
    Json(json!([{
        "id": "apt-100",
        "date": "2026-10-18",
        "time": "09:30",
        "status": status,
        "departmentId": "dep-ent",
        "patientId": "pat-1",
    }]))
    .into_response()
}
