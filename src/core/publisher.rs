use crate::core::envelope::{Delivery, EventEnvelope};
use crate::core::error_bus::BusError;
use crate::core::settings::Settings;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Sends event envelopes to the consumer at `settings.endpoint`.
///
/// One attempt per event: no retry, no queueing.
#[derive(Clone)]
pub struct Publisher {
    settings: Arc<Settings>,
    endpoint: reqwest::Url,
    http: reqwest::Client,
}

impl Publisher {
    pub fn new(settings: Arc<Settings>) -> Result<Self, BusError> {
        let raw = settings.endpoint().ok_or(BusError::MissingEndpoint)?;
        let endpoint = reqwest::Url::parse(raw)
            .map_err(|err| BusError::InvalidEndpoint(raw.to_string(), err.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(BusError::InvalidEndpoint(
                raw.to_string(),
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.publish_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| BusError::Transport(err.to_string()))?;

        Ok(Self {
            settings,
            endpoint,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Publishes `{ "type": event_type, "data": data }`.
    pub async fn publish<T>(&self, event_type: &str, data: &T) -> Result<Delivery, BusError>
    where
        T: Serialize + ?Sized,
    {
        if event_type.is_empty() {
            return Err(BusError::NoEventType);
        }

        let data = serde_json::to_value(data).map_err(|err| {
            BusError::SerializationError(event_type.to_string(), err.to_string())
        })?;
        self.send(EventEnvelope::new(event_type, data)).await
    }

    pub async fn send(&self, envelope: EventEnvelope) -> Result<Delivery, BusError> {
        if envelope.event_type.is_empty() {
            return Err(BusError::NoEventType);
        }

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(
                self.settings.auth_header(),
                self.settings.event_auth_token().expose_secret(),
            )
            .json(&envelope)
            .send()
            .await
            .map_err(|err| {
                #[cfg(feature = "logging")]
                log::warn!(
                    "Bus. Publishing '{}' to '{}' failed: {}",
                    envelope.event_type,
                    self.endpoint,
                    err
                );
                BusError::Transport(err.to_string())
            })?;

        let status = response.status().as_u16();
        if let Some(delivery) = Delivery::from_status(status) {
            #[cfg(feature = "logging")]
            log::debug!(
                "Bus. Published '{}' to '{}': {:?}",
                envelope.event_type,
                self.endpoint,
                delivery
            );
            return Ok(delivery);
        }

        #[cfg(feature = "logging")]
        log::warn!(
            "Bus. Publishing '{}' to '{}' answered with status {}",
            envelope.event_type,
            self.endpoint,
            status
        );

        match status {
            401 => Err(BusError::Unauthorized(envelope.event_type)),
            500 => {
                let reason = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|mut body| body.get_mut("error").map(Value::take));
                match reason {
                    Some(reason) => Err(BusError::HandlerFailed(envelope.event_type, reason)),
                    None => Err(BusError::UnexpectedStatus(envelope.event_type, status)),
                }
            }
            _ => Err(BusError::UnexpectedStatus(envelope.event_type, status)),
        }
    }
}
