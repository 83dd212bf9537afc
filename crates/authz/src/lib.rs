//! Authorization hooks: bearer token verification and role guards.
//!
//! The token issuer lives outside this service. Handlers only ever see an
//! [`Identity`] produced by a [`TokenVerifier`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod jwt;

pub use jwt::{Claims, JwtVerifier};

/// Caller role carried in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'; expected user/admin")),
        }
    }
}

/// Verified caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with [`AuthError::Forbidden`] unless the caller holds `role`.
    pub fn require(&self, role: Role) -> Result<(), AuthError> {
        if self.role == role || self.is_admin() {
            Ok(())
        } else {
            tracing::debug!(user_id = %self.user_id, required = %role, actual = %self.role, "role check failed");
            Err(AuthError::Forbidden(format!("{role} role required")))
        }
    }

    /// Callers may act on their own records; administrators on anyone's.
    pub fn may_act_for(&self, user_id: &Uuid) -> bool {
        self.is_admin() || &self.user_id == user_id
    }
}

/// Reasons a credential can be refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("{0}")]
    Forbidden(String),
}

/// Validates a bearer credential and yields the caller identity.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}
