//! Application error catalog.
//!
//! Every error the API can surface to an end user is declared here exactly
//! once, keyed by a symbolic [`ErrorCode`]. Codes are grouped into
//! thousand-wide ranges, one per [`Category`]:
//!
//! | Range     | Category       |
//! |-----------|----------------|
//! | 1000-1999 | Authentication |
//! | 2000-2999 | Authorization  |
//! | 3000-3999 | Validation     |
//! | 4000-4999 | Resource       |
//! | 5000-5999 | Rate limit     |
//! | 9000-9999 | Server         |
//!
//! The HTTP status of an error is derived from its code range (see
//! [`crate::status::resolve_status`]), so two entries sharing a code would
//! silently share a status. Duplicate codes fail the build through a const
//! assertion, and [`verify`] re-checks the table at startup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// A single immutable catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Symbolic key, e.g. `ALREADY_EXISTS`.
    pub name: &'static str,
    /// Numeric code, unique across the whole catalog.
    pub code: u16,
    /// Internal description for operators and logs.
    pub message: &'static str,
    /// Text safe to show to end users.
    pub user_message: &'static str,
}

impl CatalogEntry {
    pub fn category(&self) -> Option<Category> {
        Category::of(self.code)
    }
}

/// Code range a catalog entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Authentication,
    Authorization,
    Validation,
    Resource,
    RateLimit,
    Server,
}

impl Category {
    /// Map a numeric code to its category. Codes outside every range have none.
    pub const fn of(code: u16) -> Option<Self> {
        match code {
            1000..=1999 => Some(Self::Authentication),
            2000..=2999 => Some(Self::Authorization),
            3000..=3999 => Some(Self::Validation),
            4000..=4999 => Some(Self::Resource),
            5000..=5999 => Some(Self::RateLimit),
            9000..=9999 => Some(Self::Server),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::Resource => "resource",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! error_catalog {
    ($( $variant:ident = $name:literal, $code:literal, $message:literal, $user_message:literal; )+) => {
        /// Symbolic key of every catalog entry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum ErrorCode {
            $( $variant, )+
        }

        const CATALOG: &[CatalogEntry] = &[
            $( CatalogEntry {
                name: $name,
                code: $code,
                message: $message,
                user_message: $user_message,
            }, )+
        ];

        impl ErrorCode {
            /// Every key, in declaration order.
            pub const ALL: &'static [ErrorCode] = &[ $( ErrorCode::$variant, )+ ];
        }
    };
}

error_catalog! {
    // Authentication
    Unauthorized = "UNAUTHORIZED", 1000,
        "authentication required",
        "Please sign in.";
    InvalidCredentials = "INVALID_CREDENTIALS", 1001,
        "email address or password is incorrect",
        "The email address or password is incorrect.";
    TokenExpired = "TOKEN_EXPIRED", 1002,
        "session has expired",
        "Your session has expired. Please sign in again.";
    TokenInvalid = "TOKEN_INVALID", 1003,
        "token is invalid",
        "Authentication failed. Please sign in again.";
    EmailNotVerified = "EMAIL_NOT_VERIFIED", 1004,
        "email address has not been verified",
        "Please verify your email address. Would you like us to resend the confirmation email?";
    PasswordTooWeak = "PASSWORD_TOO_WEAK", 1005,
        "password is too weak",
        "Passwords must be at least 8 characters and include upper and lower case letters, a number and a symbol.";
    TwoFactorRequired = "TWO_FACTOR_REQUIRED", 1006,
        "two-factor authentication required",
        "Please enter your two-factor authentication code.";
    TwoFactorInvalid = "TWO_FACTOR_INVALID", 1007,
        "two-factor authentication code is invalid",
        "The two-factor authentication code is incorrect.";

    // Authorization
    Forbidden = "FORBIDDEN", 2000,
        "caller lacks permission for this operation",
        "You do not have permission to perform this action.";
    InsufficientPlan = "INSUFFICIENT_PLAN", 2001,
        "plan upgrade required",
        "This feature is available on the Professional plan and above.";
    OrganizationSuspended = "ORGANIZATION_SUSPENDED", 2002,
        "organization is suspended",
        "Your account has been suspended. Please contact support.";
    TrialExpired = "TRIAL_EXPIRED", 2003,
        "trial period has ended",
        "Your trial has ended. Please upgrade your plan.";
    QuotaExceeded = "QUOTA_EXCEEDED", 2004,
        "usage quota exceeded",
        "You have exceeded your plan's usage limit. Please upgrade your plan.";

    // Validation
    ValidationError = "VALIDATION_ERROR", 3000,
        "request failed validation",
        "Some of the information you entered is invalid.";
    RequiredField = "REQUIRED_FIELD", 3001,
        "required field is missing",
        "A required field is missing.";
    InvalidFormat = "INVALID_FORMAT", 3002,
        "value has an invalid format",
        "The value is not in a valid format.";
    InvalidEmail = "INVALID_EMAIL", 3003,
        "value is not a valid email address",
        "Please enter a valid email address.";
    InvalidUrl = "INVALID_URL", 3004,
        "value is not a valid URL",
        "Please enter a valid URL.";
    InvalidDate = "INVALID_DATE", 3005,
        "value is not a valid date",
        "Please enter a valid date.";
    ValueTooLong = "VALUE_TOO_LONG", 3006,
        "value is too long",
        "The value is too long.";
    ValueTooShort = "VALUE_TOO_SHORT", 3007,
        "value is too short",
        "The value is too short.";
    ValueOutOfRange = "VALUE_OUT_OF_RANGE", 3008,
        "value is out of range",
        "The value is out of range.";

    // Resource
    NotFound = "NOT_FOUND", 4000,
        "requested resource does not exist",
        "The requested resource could not be found.";
    AlreadyExists = "ALREADY_EXISTS", 4001,
        "resource already exists",
        "This already exists.";
    DuplicateEmail = "DUPLICATE_EMAIL", 4002,
        "email address is already registered",
        "This email address is already registered.";
    DuplicateDomain = "DUPLICATE_DOMAIN", 4003,
        "domain is already registered",
        "This domain is already registered.";
    ResourceInUse = "RESOURCE_IN_USE", 4004,
        "resource is in use and cannot be deleted",
        "This resource is in use and cannot be deleted.";
    ExperimentRunning = "EXPERIMENT_RUNNING", 4005,
        "experiment is running",
        "This action is not available while the experiment is running.";

    // Rate limit
    RateLimitExceeded = "RATE_LIMIT_EXCEEDED", 5000,
        "request limit reached",
        "You have reached the request limit. Please try again later.";
    TooManyRequests = "TOO_MANY_REQUESTS", 5001,
        "too many requests",
        "Too many requests. Please try again later.";
    LoginAttemptsExceeded = "LOGIN_ATTEMPTS_EXCEEDED", 5002,
        "too many login attempts",
        "Too many sign-in attempts. Please try again in 15 minutes.";

    // Server
    InternalError = "INTERNAL_ERROR", 9000,
        "internal server error",
        "Something went wrong on our side. Please try again later.";
    DatabaseError = "DATABASE_ERROR", 9001,
        "database error",
        "A database error occurred. Please try again later.";
    ExternalApiError = "EXTERNAL_API_ERROR", 9002,
        "external API request failed",
        "We could not reach an external service. Please try again later.";
    LlmApiError = "LLM_API_ERROR", 9003,
        "AI API request failed",
        "AI features are temporarily unavailable. Please try again later.";
    FileUploadError = "FILE_UPLOAD_ERROR", 9004,
        "file upload failed",
        "The file upload failed. Please try again.";
    PaymentError = "PAYMENT_ERROR", 9005,
        "payment processing failed",
        "Payment could not be processed. Please check your card details.";
}

const fn codes_are_unique(entries: &[CatalogEntry]) -> bool {
    let mut i = 0;
    while i < entries.len() {
        let mut j = i + 1;
        while j < entries.len() {
            if entries[i].code == entries[j].code {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    codes_are_unique(CATALOG),
    "error catalog contains duplicate codes"
);

impl ErrorCode {
    /// O(1) lookup of the entry behind this key.
    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self as usize]
    }

    pub fn code(self) -> u16 {
        self.entry().code
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn user_message(self) -> &'static str {
        self.entry().user_message
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorCode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ServiceError::Parse(format!("unknown error code '{}'", s)))
    }
}

/// All catalog entries in declaration order.
pub fn entries() -> &'static [CatalogEntry] {
    CATALOG
}

/// Check catalog integrity: codes pairwise distinct and each inside a
/// known category range.
pub fn verify() -> Result<(), ServiceError> {
    for (i, entry) in CATALOG.iter().enumerate() {
        if entry.category().is_none() {
            return Err(ServiceError::Catalog(format!(
                "{} uses code {} outside every category range",
                entry.name, entry.code
            )));
        }

        if let Some(other) = CATALOG[i + 1..].iter().find(|o| o.code == entry.code) {
            return Err(ServiceError::Catalog(format!(
                "{} and {} share code {}",
                entry.name, other.name, entry.code
            )));
        }
    }

    Ok(())
}
