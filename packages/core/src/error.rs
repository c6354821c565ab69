use thiserror::Error;

/// Failures of the error-handling service itself.
///
/// These never reach API consumers; they cover startup configuration,
/// the error-tracker connection, and catalog integrity.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Catalog error: {0}")]
    Catalog(String),
}
