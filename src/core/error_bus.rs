use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BusError {
    #[error("No event type defined for handler.")]
    NoEventType,

    #[error("Invalid event handler.")]
    InvalidEventHandler,

    #[error(
        "BusError: `event_auth_token` is not configured. Every consumer and publisher needs the shared secret."
    )]
    MissingAuthToken,

    #[error("BusError: Invalid auth header name '{0}'")]
    InvalidAuthHeader(String),

    #[error("BusError: `endpoint` is not configured. A publisher cannot be created without it.")]
    MissingEndpoint,

    #[error("BusError: Invalid endpoint '{0}' error '{1}'")]
    InvalidEndpoint(String, String),

    #[error("BusError: Invalid setting '{0}' error '{1}'")]
    InvalidSetting(String, String),

    #[error("BusError: Invalid route path '{0}', it must start with '/'")]
    InvalidRoutePath(String),

    #[error("BusError: Cant Serialize event '{0}' error '{1}'")]
    SerializationError(String, String),

    #[error("BusError: Transport error '{0}'")]
    Transport(String),

    #[error("BusError: Event '{0}' was refused, the auth token does not match the consumer")]
    Unauthorized(String),

    #[error("BusError: Handler for event '{0}' failed with '{1}'")]
    HandlerFailed(String, serde_json::Value),

    #[error("BusError: Unexpected status {1} for event '{0}'")]
    UnexpectedStatus(String, u16),
}
