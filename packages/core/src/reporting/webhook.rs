//! Webhook error-tracker delivery.
//!
//! POSTs each [`ErrorReport`] as JSON to a configured URL. Any HTTP
//! endpoint that accepts JSON can act as the tracker, e.g. a Sentry
//! relay or an incident webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{ErrorReport, ErrorReporter};
use crate::error::ServiceError;

#[derive(Clone)]
pub struct WebhookReporter {
    url: String,
    http: Client,
}

impl WebhookReporter {
    pub fn new(url: String, timeout: Duration) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ServiceError::Config(format!("error tracker client: {}", err)))?;

        Ok(Self { url, http })
    }
}

#[async_trait]
impl ErrorReporter for WebhookReporter {
    async fn report(&self, report: ErrorReport) -> Result<(), ServiceError> {
        let response = self
            .http
            .post(&self.url)
            .json(&report)
            .send()
            .await
            .map_err(|err| ServiceError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::Network(format!(
                "Error tracker returned HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
