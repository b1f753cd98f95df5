use serde::{Deserialize, Serialize};

/// Minimum department name length accepted before calling the backend.
pub const MIN_DEPARTMENT_NAME_LEN: usize = 2;

/// A hospital department (service line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<String>,
}

/// Request body for `/departments/create-department`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub name: String,
    pub hospital_id: String,
}

impl NewDepartment {
    /// Trims the name; `None` if it is too short to submit.
    pub fn new(name: &str, hospital_id: &str) -> Option<Self> {
        let name = name.trim();
        if name.chars().count() < MIN_DEPARTMENT_NAME_LEN || hospital_id.trim().is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            hospital_id: hospital_id.trim().to_string(),
        })
    }
}
