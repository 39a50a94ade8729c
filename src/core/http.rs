use crate::core::consumer::Consumer;
use crate::core::contracts::EventRequest;
use crate::core::envelope::ConsumerResponse;
use crate::core::error_bus::BusError;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use once_cell::sync::OnceCell;
use serde_json::Value;

/// An inbound request as received by axum: headers plus the raw body.
///
/// The body is decoded on first access, so a request rejected on its
/// auth header is never parsed.
pub struct HttpEventRequest {
    headers: HeaderMap,
    raw: Bytes,
    body: OnceCell<Option<Value>>,
}

impl HttpEventRequest {
    pub fn from_parts(headers: HeaderMap, body: Bytes) -> Self {
        Self {
            headers,
            raw: body,
            body: OnceCell::new(),
        }
    }

    /// An empty body, a JSON `null`, or one that is not JSON counts as no body.
    fn decode(raw: &[u8]) -> Option<Value> {
        if raw.is_empty() {
            return None;
        }

        match serde_json::from_slice(raw) {
            Ok(Value::Null) => None,
            Ok(body) => Some(body),
            Err(_err) => {
                #[cfg(feature = "logging")]
                log::warn!("Bus. Request body is not JSON: {}", _err);
                None
            }
        }
    }
}

impl EventRequest for HttpEventRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    fn body(&self) -> Option<&Value> {
        self.body.get_or_init(|| Self::decode(&self.raw)).as_ref()
    }
}

impl IntoResponse for ConsumerResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.body() {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}

impl Consumer {
    /// Router answering `POST path` with this consumer. `path` must start with `/`.
    pub fn router(&self, path: &str) -> Result<Router, BusError> {
        if !path.starts_with('/') {
            return Err(BusError::InvalidRoutePath(path.to_string()));
        }

        Ok(Router::new()
            .route(path, post(receive))
            .with_state(self.clone()))
    }

    pub async fn handle(&self, headers: HeaderMap, body: Bytes) -> Response {
        let request = HttpEventRequest::from_parts(headers, body);
        self.dispatch(&request).await.into_response()
    }
}

async fn receive(State(consumer): State<Consumer>, headers: HeaderMap, body: Bytes) -> Response {
    consumer.handle(headers, body).await
}
