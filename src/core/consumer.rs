use crate::core::contracts::{
    EventRequest, HandlerFailure, IErasedEventHandler, IEventData, IEventHandler, TypeNamed,
};
use crate::core::envelope::{ConsumerResponse, EventEnvelope};
use crate::core::error_bus::BusError;
use crate::core::event_handlers::{
    EventHandlerWrapper, FnEventHandler, SyncFnEventHandler, invoke,
};
use crate::core::registry::HandlerRegistry;
use crate::core::settings::Settings;
use serde_json::Value;
use std::sync::Arc;

/// Receives webhook events and dispatches them to the handler registered for
/// their type.
///
/// Clones share one registry. Separately created consumers never do.
#[derive(Clone)]
pub struct Consumer {
    settings: Arc<Settings>,
    registry: Arc<HandlerRegistry>,
}

impl Consumer {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            registry: Arc::new(HandlerRegistry::new()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Registers an async handler for `event_type`.
    ///
    /// ```rust,ignore
    /// consumer.on("user.created", |data| async move {
    ///     println!("created: {data}");
    ///     Ok(())
    /// })?;
    /// ```
    pub fn on<F, Fut>(&self, event_type: &str, handler: F) -> Result<(), BusError>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerFailure>> + Send + 'static,
    {
        let type_name = handler.type_name();
        self.registry.register(
            Some(event_type),
            Some(Arc::new(FnEventHandler(handler))),
            type_name,
        )
    }

    /// Registers a handler that completes without suspending.
    pub fn on_sync<F>(&self, event_type: &str, handler: F) -> Result<(), BusError>
    where
        F: Fn(Value) -> Result<(), HandlerFailure> + Send + Sync + 'static,
    {
        let type_name = handler.type_name();
        self.registry.register(
            Some(event_type),
            Some(Arc::new(SyncFnEventHandler(handler))),
            type_name,
        )
    }

    /// Registers a typed handler. `data` is decoded into `TData` first; a
    /// payload that does not decode fails the event.
    pub fn on_handler<H, TData>(&self, event_type: &str, handler: H) -> Result<(), BusError>
    where
        H: IEventHandler<TData>,
        TData: IEventData,
    {
        self.registry.register(
            Some(event_type),
            Some(Arc::new(EventHandlerWrapper::new(handler))),
            std::any::type_name::<H>(),
        )
    }

    /// Checked registration for handler tables assembled at runtime, where
    /// either side may be absent.
    pub fn register(
        &self,
        event_type: Option<&str>,
        handler: Option<Arc<dyn IErasedEventHandler>>,
    ) -> Result<(), BusError> {
        self.registry
            .register(event_type, handler, "dyn IErasedEventHandler")
    }

    pub fn is_registered(&self, event_type: &str) -> bool {
        self.registry.contains(event_type)
    }

    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Authenticates, parses and dispatches one request. Never fails: every
    /// outcome, handler errors included, becomes a [`ConsumerResponse`].
    pub async fn dispatch<R>(&self, request: &R) -> ConsumerResponse
    where
        R: EventRequest + ?Sized,
    {
        let authorized = request
            .header(self.settings.auth_header())
            .is_some_and(|token| self.settings.token_matches(token));
        if !authorized {
            #[cfg(feature = "logging")]
            log::warn!("Bus. Rejected event, auth header missing or wrong");
            return ConsumerResponse::Unauthorized;
        }

        let Some(body) = request.body() else {
            #[cfg(feature = "logging")]
            log::warn!("Bus. Rejected event, request has no body");
            return ConsumerResponse::MissingBody;
        };

        let Some(event_type) = EventEnvelope::event_type_of(body) else {
            #[cfg(feature = "logging")]
            log::debug!("Bus. Event without type, nothing to do");
            return ConsumerResponse::Unhandled;
        };

        let Some(handler) = self.registry.get(event_type) else {
            #[cfg(feature = "logging")]
            log::debug!("Bus. No handler for event type '{}'", event_type);
            return ConsumerResponse::Unhandled;
        };

        match invoke(handler.as_ref(), EventEnvelope::data_of(body)).await {
            Ok(()) => ConsumerResponse::Handled,
            Err(failure) => {
                #[cfg(feature = "logging")]
                log::error!(
                    "Bus. Handler for event type '{}' failed: {}",
                    event_type,
                    failure
                );
                ConsumerResponse::Failed(failure.into_reason())
            }
        }
    }
}
