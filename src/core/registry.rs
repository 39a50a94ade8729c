use crate::core::contracts::IErasedEventHandler;
use crate::core::error_bus::BusError;
use dashmap::DashMap;
use std::sync::Arc;

/// Event type to handler table owned by a single consumer.
///
/// One handler per event type. Registering a type twice replaces the earlier
/// handler.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: DashMap<String, Arc<dyn IErasedEventHandler>>,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(
        &self,
        event_type: Option<&str>,
        handler: Option<Arc<dyn IErasedEventHandler>>,
        handler_type_name: &str,
    ) -> Result<(), BusError> {
        let event_type = match event_type {
            Some(event_type) if !event_type.is_empty() => event_type,
            _ => return Err(BusError::NoEventType),
        };
        let handler = handler.ok_or(BusError::InvalidEventHandler)?;

        if self
            .handlers
            .insert(event_type.to_string(), handler)
            .is_some()
        {
            #[cfg(feature = "logging")]
            log::warn!(
                "Bus. Handler for event type '{}' replaced by '{}'",
                event_type,
                handler_type_name
            );
        }

        #[cfg(feature = "logging")]
        log::debug!(
            "Bus. Registered handler '{}' for event type '{}'",
            handler_type_name,
            event_type
        );

        #[cfg(not(feature = "logging"))]
        let _ = handler_type_name;

        Ok(())
    }

    /// Cloned out so the map shard is not held while the handler runs.
    pub(crate) fn get(&self, event_type: &str) -> Option<Arc<dyn IErasedEventHandler>> {
        self.handlers
            .get(event_type)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn contains(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }
}
