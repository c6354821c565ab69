//! Error classification.
//!
//! Every caught value is assigned exactly one [`Caught`] variant before it
//! is translated into a response. Typed errors convert through `From`;
//! boxed trait objects are classified by downcasting; JSON payloads from
//! upstream services are classified by shape. Anything unrecognised is
//! [`Caught::Unrecoverable`].

pub mod driver;
pub mod validation;

use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::app_error::AppError;

pub use driver::{DriverError, DriverErrorKind};
pub use validation::{FieldIssue, PathSegment, ValidationError, ValidationIssue};

/// `name` carried by validation-error payloads from the schema layer.
pub const VALIDATION_ERROR_TAG: &str = "ZodError";

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Which branch of the dispatcher a caught value takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationTag {
    ApplicationError,
    DriverError,
    ValidationError,
    Unrecoverable,
}

impl ClassificationTag {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationError => "application",
            Self::DriverError => "driver",
            Self::ValidationError => "validation",
            Self::Unrecoverable => "unrecoverable",
        }
    }
}

impl fmt::Display for ClassificationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caught error, tagged by origin.
#[derive(Debug)]
pub enum Caught {
    Application(AppError),
    Driver(DriverError),
    Validation(ValidationError),
    Unrecoverable(BoxError),
}

/// An error payload received as JSON that matched no known shape.
#[derive(Debug, Error)]
#[error("unrecognised error payload: {0}")]
pub struct ForeignError(pub Value);

impl Caught {
    pub fn tag(&self) -> ClassificationTag {
        match self {
            Self::Application(_) => ClassificationTag::ApplicationError,
            Self::Driver(_) => ClassificationTag::DriverError,
            Self::Validation(_) => ClassificationTag::ValidationError,
            Self::Unrecoverable(_) => ClassificationTag::Unrecoverable,
        }
    }

    /// Classify a type-erased error by downcasting to the known types.
    pub fn classify(err: BoxError) -> Self {
        let err = match err.downcast::<AppError>() {
            Ok(app) => return Self::Application(*app),
            Err(err) => err,
        };
        let err = match err.downcast::<sqlx::Error>() {
            Ok(db) => return Self::Driver(DriverError::from(*db)),
            Err(err) => err,
        };
        let err = match err.downcast::<DriverError>() {
            Ok(driver) => return Self::Driver(*driver),
            Err(err) => err,
        };
        match err.downcast::<ValidationError>() {
            Ok(validation) => Self::Validation(*validation),
            Err(err) => Self::Unrecoverable(err),
        }
    }

    /// Classify an error payload by its JSON shape.
    ///
    /// - `{ "code": "<string>", "message": "<string>" }` is a driver error.
    /// - An object tagged `"name": "ZodError"` with an `issues` (or `errors`)
    ///   array whose items all carry a `path` array and a `message` string is
    ///   a validation error. Untagged issue lists are not trusted.
    pub fn from_value(value: Value) -> Self {
        if let Some(driver) = driver_from_value(&value) {
            return Self::Driver(driver);
        }
        if let Some(validation) = validation_from_value(&value) {
            return Self::Validation(validation);
        }
        Self::Unrecoverable(Box::new(ForeignError(value)))
    }
}

fn driver_from_value(value: &Value) -> Option<DriverError> {
    let code = value.get("code")?.as_str()?;
    let message = value.get("message")?.as_str()?;
    Some(DriverError::new(code, message))
}

fn validation_from_value(value: &Value) -> Option<ValidationError> {
    if value.get("name")?.as_str()? != VALIDATION_ERROR_TAG {
        return None;
    }
    let issues = value
        .get("issues")
        .or_else(|| value.get("errors"))?
        .as_array()?;

    let issues = issues
        .iter()
        .map(|issue| {
            let path = issue
                .get("path")?
                .as_array()?
                .iter()
                .map(|segment| match segment {
                    Value::String(key) => Some(PathSegment::Key(key.clone())),
                    Value::Number(n) => n
                        .as_u64()
                        .and_then(|i| usize::try_from(i).ok())
                        .map(PathSegment::Index),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            let message = issue.get("message")?.as_str()?;
            Some(ValidationIssue {
                path,
                message: message.to_string(),
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(ValidationError::new(issues))
}

impl From<AppError> for Caught {
    fn from(err: AppError) -> Self {
        Self::Application(err)
    }
}

impl From<DriverError> for Caught {
    fn from(err: DriverError) -> Self {
        Self::Driver(err)
    }
}

impl From<sqlx::Error> for Caught {
    fn from(err: sqlx::Error) -> Self {
        Self::Driver(DriverError::from(err))
    }
}

impl From<ValidationError> for Caught {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<BoxError> for Caught {
    fn from(err: BoxError) -> Self {
        Self::classify(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ErrorCode;
    use serde_json::json;

    #[test]
    fn downcast_finds_app_error() {
        let err: BoxError = Box::new(AppError::new(ErrorCode::Forbidden));
        let caught = Caught::classify(err);
        assert_eq!(caught.tag(), ClassificationTag::ApplicationError);
    }

    #[test]
    fn downcast_finds_sqlx_error() {
        let err: BoxError = Box::new(sqlx::Error::PoolTimedOut);
        assert_eq!(Caught::classify(err).tag(), ClassificationTag::DriverError);
    }

    #[test]
    fn downcast_finds_validation_error() {
        let err: BoxError = Box::new(ValidationError::default().with_issue(["email"], "invalid"));
        assert_eq!(Caught::classify(err).tag(), ClassificationTag::ValidationError);
    }

    #[test]
    fn unknown_errors_are_unrecoverable() {
        let err: BoxError = "boom".into();
        let caught = Caught::classify(err);
        assert_eq!(caught.tag(), ClassificationTag::Unrecoverable);
        match caught {
            Caught::Unrecoverable(inner) => assert_eq!(inner.to_string(), "boom"),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn json_with_code_and_message_is_a_driver_error() {
        let caught = Caught::from_value(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint",
            "details": null
        }));
        match caught {
            Caught::Driver(driver) => assert_eq!(driver.kind(), DriverErrorKind::UniqueViolation),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn numeric_code_is_not_a_driver_error() {
        let caught = Caught::from_value(json!({ "code": 500, "message": "nope" }));
        assert_eq!(caught.tag(), ClassificationTag::Unrecoverable);
    }

    #[test]
    fn json_issue_list_is_a_validation_error() {
        let caught = Caught::from_value(json!({
            "name": "ZodError",
            "issues": [
                { "path": ["address", "lines", 1], "message": "too long" },
                { "path": ["email"], "message": "invalid" }
            ]
        }));
        match caught {
            Caught::Validation(validation) => {
                let fields: Vec<String> = validation.fields().into_iter().map(|f| f.field).collect();
                assert_eq!(fields, vec!["address.lines.1", "email"]);
                assert_eq!(validation.issues()[0].path[2], PathSegment::Index(1));
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn malformed_issue_list_is_unrecoverable() {
        let caught = Caught::from_value(json!({
            "name": "ZodError",
            "errors": [{ "message": "no path" }]
        }));
        assert_eq!(caught.tag(), ClassificationTag::Unrecoverable);
    }

    #[test]
    fn untagged_issue_list_is_unrecoverable() {
        let caught = Caught::from_value(json!({
            "errors": [{ "message": "internal: connection refused", "path": ["user", "email"] }]
        }));
        assert_eq!(caught.tag(), ClassificationTag::Unrecoverable);

        let caught = Caught::from_value(json!({
            "name": "GraphQLError",
            "issues": [{ "message": "internal", "path": ["email"] }]
        }));
        assert_eq!(caught.tag(), ClassificationTag::Unrecoverable);
    }
}
