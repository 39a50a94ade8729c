use crate::core::error_bus::BusError;
use async_trait::async_trait;
use serde_json::Value;
use std::any::type_name;
use std::error::Error;
use std::fmt;

pub trait TypeNamed {
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl<T> TypeNamed for T {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Payload a typed handler expects in the envelope's `data` field.
pub trait IEventData: serde::de::DeserializeOwned + Send + Sync + 'static {}
impl<T> IEventData for T where T: serde::de::DeserializeOwned + Send + Sync + 'static {}

/// Reason a handler gave for failing. Echoed back to the publisher verbatim
/// as `{ "error": <reason> }`.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerFailure(Value);

impl HandlerFailure {
    pub fn new(reason: impl Into<Value>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &Value {
        &self.0
    }

    pub fn into_reason(self) -> Value {
        self.0
    }
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(reason) => write!(f, "{reason}"),
            other => write!(f, "{other}"),
        }
    }
}

impl Error for HandlerFailure {}

impl From<&str> for HandlerFailure {
    fn from(reason: &str) -> Self {
        Self(Value::String(reason.to_string()))
    }
}

impl From<String> for HandlerFailure {
    fn from(reason: String) -> Self {
        Self(Value::String(reason))
    }
}

impl From<Value> for HandlerFailure {
    fn from(reason: Value) -> Self {
        Self(reason)
    }
}

impl From<BusError> for HandlerFailure {
    fn from(err: BusError) -> Self {
        Self(Value::String(err.to_string()))
    }
}

/// Read access to an inbound webhook request, independent of the HTTP stack
/// that received it.
pub trait EventRequest: Send + Sync {
    /// Header value by name. Lookups are case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;

    /// Parsed JSON body, `None` when the request carried none.
    fn body(&self) -> Option<&Value>;
}

#[async_trait]
pub trait IEventHandler<TData>: Send + Sync + 'static
where
    TData: IEventData,
{
    async fn handle_async(&self, data: TData) -> Result<(), HandlerFailure>;
}

#[async_trait]
pub trait IErasedEventHandler: Send + Sync {
    async fn handle(&self, data: Value) -> Result<(), HandlerFailure>;
}
