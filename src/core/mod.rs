pub mod client;
pub mod consumer;
pub mod contracts;
pub mod envelope;
pub mod error_bus;
pub mod event_handlers;
pub mod settings;

#[cfg(feature = "axum")]
pub mod http;

#[cfg(feature = "publisher")]
pub mod publisher;

pub(crate) mod registry;
