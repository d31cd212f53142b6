//! # Push Notification Delivery
//!
//! Sends the composed message through the Pushover messages API, one request
//! per target device. Delivery is sequential and stops at the first device the
//! service rejects.

use thiserror::Error;
use tracing::{error, info};

/// Errors raised while delivering a notification.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// HTTP request failed (network, DNS, TLS or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service refused the message for a device
    #[error("notification to {device} rejected with status {status}: {body}")]
    Rejected {
        device: String,
        status: u16,
        body: String,
    },
}

/// Client for the push notification service.
pub struct Notifier {
    http: reqwest::Client,
    url: String,
    token: String,
    user: String,
    title: String,
}

impl Notifier {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        user: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            token: token.into(),
            user: user.into(),
            title: title.into(),
        }
    }

    /// Deliver `message` to a single device.
    pub async fn send(&self, device: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .query(&[
                ("token", self.token.as_str()),
                ("user", self.user.as_str()),
                ("title", self.title.as_str()),
                ("message", message),
                ("device", device),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                device: device.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Deliver `message` to every device in order, stopping at the first failure.
    ///
    /// Returns the number of devices notified.
    pub async fn broadcast(&self, devices: &[String], message: &str) -> Result<usize, NotifyError> {
        for (sent, device) in devices.iter().enumerate() {
            if let Err(e) = self.send(device, message).await {
                error!(device = %device, skipped = devices.len() - sent - 1, "{e}");
                return Err(e);
            }
            info!(device = %device, "Sent notification");
        }
        Ok(devices.len())
    }
}
