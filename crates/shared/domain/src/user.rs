//! User domain entity and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_ATTENDEE, ROLE_ORGANIZER};
use crate::error::{DomainError, DomainResult};

/// User roles. A user may hold several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Attendee,
    Organizer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Attendee => ROLE_ATTENDEE,
            UserRole::Organizer => ROLE_ORGANIZER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ATTENDEE => Ok(UserRole::Attendee),
            ROLE_ORGANIZER => Ok(UserRole::Organizer),
            ROLE_ADMIN => Ok(UserRole::Admin),
            _ => Err(DomainError::validation("Invalid role provided")),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a list of role names. Any unknown value rejects the whole list.
pub fn parse_roles<S: AsRef<str>>(values: &[S]) -> DomainResult<Vec<UserRole>> {
    let mut roles = Vec::with_capacity(values.len());
    for value in values {
        let role: UserRole = value.as_ref().parse()?;
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(roles)
}

/// Join roles for storage in a single text column.
pub fn join_roles(roles: &[UserRole]) -> String {
    roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`join_roles`]. Unknown entries are skipped.
pub fn split_roles(stored: &str) -> Vec<UserRole> {
    stored
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

/// User domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub roles: Vec<UserRole>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }
}

/// User as returned to clients. Carries neither the hash nor the refresh token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<UserRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_uppercase() {
        let json = serde_json::to_string(&vec![UserRole::Attendee, UserRole::Organizer]).unwrap();
        assert_eq!(json, r#"["ATTENDEE","ORGANIZER"]"#);
    }

    #[test]
    fn parse_roles_rejects_unknown() {
        let err = parse_roles(&["ATTENDEE", "superuser"]).unwrap_err();
        assert_eq!(err, DomainError::Validation("Invalid role provided".into()));
    }

    #[test]
    fn parse_roles_is_case_sensitive_and_dedups() {
        assert!(parse_roles(&["admin"]).is_err());
        assert_eq!(
            parse_roles(&["ORGANIZER", "ORGANIZER"]).unwrap(),
            vec![UserRole::Organizer]
        );
    }

    #[test]
    fn stored_roles_roundtrip() {
        let roles = vec![UserRole::Attendee, UserRole::Admin];
        assert_eq!(join_roles(&roles), "ATTENDEE,ADMIN");
        assert_eq!(split_roles("ATTENDEE,ADMIN"), roles);
        assert!(split_roles("").is_empty());
    }

    #[test]
    fn response_hides_secrets() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "jane@example.com".into(),
            password_hash: "hash".into(),
            name: "Jane".into(),
            roles: vec![UserRole::Attendee],
            refresh_token: Some("refresh".into()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("refreshToken").is_none());
        assert_eq!(json["roles"], serde_json::json!(["ATTENDEE"]));
        assert!(json.get("createdAt").is_some());
    }
}
