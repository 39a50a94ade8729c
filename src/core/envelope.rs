use crate::core::contracts::EventRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Wire format shared by publisher and consumer: `{ "type": ..., "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

impl EventEnvelope {
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// `type` of a raw body, when present and a string.
    pub(crate) fn event_type_of(body: &Value) -> Option<&str> {
        body.get("type").and_then(Value::as_str)
    }

    /// `data` of a raw body, `null` when absent.
    pub(crate) fn data_of(body: &Value) -> Value {
        body.get("data").cloned().unwrap_or(Value::Null)
    }
}

/// Transport-neutral inbound request, for hosts that are not served through
/// the bundled axum adapter.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl InboundRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl EventRequest for InboundRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// What the consumer answers for one inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumerResponse {
    /// 401, auth header absent or wrong.
    Unauthorized,
    /// 500, the request carried no body.
    MissingBody,
    /// 204, no handler for the event type.
    Unhandled,
    /// 200, handler completed.
    Handled,
    /// 500, handler failed with the given reason.
    Failed(Value),
}

impl ConsumerResponse {
    pub fn status(&self) -> u16 {
        match self {
            ConsumerResponse::Unauthorized => 401,
            ConsumerResponse::MissingBody => 500,
            ConsumerResponse::Unhandled => 204,
            ConsumerResponse::Handled => 200,
            ConsumerResponse::Failed(_) => 500,
        }
    }

    /// JSON body to send, if any.
    pub fn body(&self) -> Option<Value> {
        match self {
            ConsumerResponse::Failed(reason) => Some(json!({ "error": reason })),
            _ => None,
        }
    }
}

/// How a published event was received by the remote consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// 200, a handler ran and succeeded.
    Handled,
    /// 204, the consumer has no handler for the event type.
    Unhandled,
    /// Any other 2xx status.
    Accepted(u16),
}

impl Delivery {
    pub(crate) fn from_status(status: u16) -> Option<Self> {
        match status {
            200 => Some(Delivery::Handled),
            204 => Some(Delivery::Unhandled),
            201..=299 => Some(Delivery::Accepted(status)),
            _ => None,
        }
    }
}
