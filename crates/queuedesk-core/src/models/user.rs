use std::fmt;

use serde::{Deserialize, Serialize};

/// Role assigned to an account by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Patient,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// "Admins", as used in access-denied messages.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Role::Admin => "Admins",
            Role::Patient => "Patients",
            Role::Unknown => "Authorized users",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "ADMIN",
            Role::Patient => "PATIENT",
            Role::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Profile of the signed-in account, as returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// "Name <email>" for status lines.
    pub fn display(&self) -> String {
        if self.name.trim().is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

/// The part of the login payload's user the role gate needs. Other fields
/// may be missing; the full profile comes from `/auth/me`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub role: Option<Role>,
}

/// Body of a successful `/auth/login` response.
///
/// The token is optional here so that a malformed success response surfaces
/// as a login failure instead of a decode error.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

impl LoginResponse {
    /// Role reported alongside the token, if any.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|user| user.role)
    }
}
