//! Error logging and forwarding.
//!
//! [`ErrorLogger`] is the single place unclassified errors are recorded.
//! Every call writes a `tracing` event. In production, when a reporter is
//! configured, the error is also forwarded to the external tracker on a
//! detached task; the caller never waits for it and forwarding failures
//! are logged and dropped.

pub mod webhook;

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::{Config, Environment};
use crate::error::ServiceError;

pub use webhook::WebhookReporter;

/// What gets forwarded to the error tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    /// `source()` chain, outermost first.
    pub causes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub environment: Environment,
    pub occurred_at: DateTime<Utc>,
}

impl ErrorReport {
    pub fn new(
        error: &(dyn StdError + 'static),
        context: Option<Value>,
        environment: Environment,
    ) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            causes,
            context,
            environment,
            occurred_at: Utc::now(),
        }
    }
}

/// External error-tracking collaborator.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, report: ErrorReport) -> Result<(), ServiceError>;

    /// Name used in log lines.
    fn name(&self) -> &str;
}

#[derive(Clone, Default)]
pub struct ErrorLogger {
    environment: Environment,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl fmt::Debug for ErrorLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorLogger")
            .field("environment", &self.environment)
            .field("reporter", &self.reporter.as_ref().map(|r| r.name().to_string()))
            .finish()
    }
}

impl ErrorLogger {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build a logger from config, wiring a [`WebhookReporter`] when a
    /// tracker URL is set.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let logger = Self::new(config.environment);

        match &config.tracker_url {
            Some(url) => {
                let reporter = WebhookReporter::new(url.clone(), config.tracker_timeout)?;
                Ok(logger.with_reporter(Arc::new(reporter)))
            }
            None => Ok(logger),
        }
    }

    /// Record `error` locally and, in production, forward it.
    ///
    /// Returns the forwarding task when one was spawned. Callers are free
    /// to drop it.
    pub fn log_error(
        &self,
        error: &(dyn StdError + 'static),
        context: Option<Value>,
    ) -> Option<JoinHandle<()>> {
        let report = ErrorReport::new(error, context, self.environment);
        let context = report
            .context
            .as_ref()
            .map_or_else(|| "none".to_string(), |ctx| ctx.to_string());

        tracing::error!(
            "Unhandled error: {} (causes: {:?}, context: {})",
            report.message,
            report.causes,
            context,
        );

        if !self.environment.is_production() {
            return None;
        }
        let reporter = self.reporter.clone()?;

        match Handle::try_current() {
            Ok(handle) => Some(handle.spawn(async move {
                if let Err(err) = reporter.report(report).await {
                    tracing::warn!("Failed to forward error report via {}: {}", reporter.name(), err);
                }
            })),
            Err(_) => {
                tracing::warn!(
                    "No async runtime available; error report for {} dropped",
                    reporter.name()
                );
                None
            }
        }
    }
}
