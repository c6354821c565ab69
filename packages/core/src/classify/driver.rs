//! Database driver errors.

use std::fmt;

use sqlx::error::ErrorKind;

/// PostgREST JWT / row-level-security rejection.
pub const AUTH_POLICY_VIOLATION: &str = "PGRST301";
/// SQLSTATE `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// The driver failures the dispatcher treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    AuthPolicyViolation,
    UniqueViolation,
    ForeignKeyViolation,
    Other,
}

impl DriverErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            AUTH_POLICY_VIOLATION => Self::AuthPolicyViolation,
            UNIQUE_VIOLATION => Self::UniqueViolation,
            FOREIGN_KEY_VIOLATION => Self::ForeignKeyViolation,
            _ => Self::Other,
        }
    }
}

/// An error surfaced by the data-store client.
///
/// `message` is the driver's own text and is only ever logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    code: Option<String>,
    message: String,
    kind: DriverErrorKind,
}

impl DriverError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            kind: DriverErrorKind::from_code(&code),
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> DriverErrorKind {
        self.kind
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "database error {}: {}", code, self.message),
            None => write!(f, "database error: {}", self.message),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<sqlx::Error> for DriverError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                let code = db.code().map(|c| c.into_owned());
                // Backend-specific codes differ (SQLite reports extended
                // result codes), so the driver's own classification goes first.
                let kind = match db.kind() {
                    ErrorKind::UniqueViolation => DriverErrorKind::UniqueViolation,
                    ErrorKind::ForeignKeyViolation => DriverErrorKind::ForeignKeyViolation,
                    _ => code
                        .as_deref()
                        .map(DriverErrorKind::from_code)
                        .unwrap_or(DriverErrorKind::Other),
                };

                Self {
                    code,
                    message: db.message().to_string(),
                    kind,
                }
            }
            other => Self {
                code: None,
                message: other.to_string(),
                kind: DriverErrorKind::Other,
            },
        }
    }
}
