pub mod core;

pub use crate::core::client::Client;
pub use crate::core::consumer::Consumer;
pub use crate::core::contracts::{EventRequest, HandlerFailure, IErasedEventHandler, IEventHandler};
pub use crate::core::envelope::{ConsumerResponse, Delivery, EventEnvelope, InboundRequest};
pub use crate::core::error_bus::BusError;
pub use crate::core::settings::{Settings, SettingsDto};

#[cfg(feature = "axum")]
pub use crate::core::http::HttpEventRequest;

#[cfg(feature = "publisher")]
pub use crate::core::publisher::Publisher;

use std::sync::Arc;

/// Consumer with an empty handler registry of its own.
pub fn create_consumer(settings: impl Into<Arc<Settings>>) -> Consumer {
    Consumer::new(settings.into())
}

#[cfg(feature = "publisher")]
pub fn create_publisher(settings: impl Into<Arc<Settings>>) -> Result<Publisher, BusError> {
    Publisher::new(settings.into())
}

pub fn create_client(settings: impl Into<Arc<Settings>>) -> Result<Client, BusError> {
    Client::new(settings.into())
}
