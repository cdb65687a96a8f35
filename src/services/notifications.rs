use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::models::Booking;
use crate::state::AppState;

pub const CONFIRMATION_FUNCTION: &str = "send-booking-confirmation";

#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send_confirmation(&self, booking: &Booking) -> anyhow::Result<()>;
}

/// Calls the `send-booking-confirmation` serverless function.
pub struct HttpConfirmationSender {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpConfirmationSender {
    pub fn new(functions_url: &str, api_key: String) -> Self {
        Self {
            endpoint: format!("{}/{CONFIRMATION_FUNCTION}", functions_url.trim_end_matches('/')),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ConfirmationSender for HttpConfirmationSender {
    async fn send_confirmation(&self, booking: &Booking) -> anyhow::Result<()> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "booking": booking }));
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        request
            .send()
            .await
            .context("failed to call confirmation function")?
            .error_for_status()
            .context("confirmation function returned error")?;

        Ok(())
    }
}

/// Used when no functions host is configured.
pub struct NoopConfirmationSender;

#[async_trait]
impl ConfirmationSender for NoopConfirmationSender {
    async fn send_confirmation(&self, booking: &Booking) -> anyhow::Result<()> {
        tracing::debug!(booking_id = %booking.id, "confirmation sending disabled, skipping");
        Ok(())
    }
}

/// Fire-and-forget: failures are logged, never returned to the caller.
pub fn dispatch_confirmation(state: &Arc<AppState>, booking: Booking) -> tokio::task::JoinHandle<()> {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        if let Err(e) = state.confirmations.send_confirmation(&booking).await {
            tracing::error!(error = %e, booking_id = %booking.id, "failed to send booking confirmation");
        }
    })
}
