use crate::core::contracts::{HandlerFailure, IErasedEventHandler, IEventData, IEventHandler};
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;

pub struct EventHandlerWrapper<H, TData>
where
    H: IEventHandler<TData>,
    TData: IEventData,
{
    inner: H,
    _phantom: std::marker::PhantomData<fn() -> TData>,
}

impl<H, TData> EventHandlerWrapper<H, TData>
where
    H: IEventHandler<TData>,
    TData: IEventData,
{
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<H, TData> IErasedEventHandler for EventHandlerWrapper<H, TData>
where
    H: IEventHandler<TData>,
    TData: IEventData,
{
    async fn handle(&self, data: Value) -> Result<(), HandlerFailure> {
        let data = serde_json::from_value::<TData>(data).map_err(|err| {
            HandlerFailure::from(format!(
                "Incorrect event data for '{}': {}",
                std::any::type_name::<TData>(),
                err
            ))
        })?;
        self.inner.handle_async(data).await
    }
}

/// Adapts an async closure `Fn(Value) -> impl Future<Output = Result<(), HandlerFailure>>`.
pub struct FnEventHandler<F>(pub F);

#[async_trait]
impl<F, Fut> IErasedEventHandler for FnEventHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerFailure>> + Send + 'static,
{
    async fn handle(&self, data: Value) -> Result<(), HandlerFailure> {
        (self.0)(data).await
    }
}

/// Adapts a closure that completes synchronously.
pub struct SyncFnEventHandler<F>(pub F);

#[async_trait]
impl<F> IErasedEventHandler for SyncFnEventHandler<F>
where
    F: Fn(Value) -> Result<(), HandlerFailure> + Send + Sync + 'static,
{
    async fn handle(&self, data: Value) -> Result<(), HandlerFailure> {
        (self.0)(data)
    }
}

/// Runs a handler to completion. A panic inside the handler is reported as a
/// failure carrying the panic message instead of unwinding into the caller.
pub(crate) async fn invoke(
    handler: &dyn IErasedEventHandler,
    data: Value,
) -> Result<(), HandlerFailure> {
    match AssertUnwindSafe(handler.handle(data)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(HandlerFailure::from(panic_message(panic))),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "event handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, serde::Deserialize)]
    struct UserCreated {
        id: u64,
    }

    struct CountingHandler {
        pub called: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IEventHandler<UserCreated> for CountingHandler {
        async fn handle_async(&self, data: UserCreated) -> Result<(), HandlerFailure> {
            self.called.fetch_add(data.id as usize, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_event_handler_wrapper_deserializes_data() {
        let counter = Arc::new(AtomicUsize::new(0));
        let wrapper = EventHandlerWrapper::new(CountingHandler {
            called: counter.clone(),
        });

        let result = wrapper.handle(json!({ "id": 7 })).await;
        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_event_handler_wrapper_type_mismatch() {
        let counter = Arc::new(AtomicUsize::new(0));
        let wrapper = EventHandlerWrapper::new(CountingHandler {
            called: counter.clone(),
        });

        let failure = wrapper.handle(json!("not a user")).await.unwrap_err();
        let reason = failure.reason().as_str().unwrap();
        assert!(reason.starts_with("Incorrect event data for"));
        assert!(reason.contains("UserCreated"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fn_event_handler_passes_data_through() {
        let handler = FnEventHandler(|data: Value| async move {
            assert_eq!(data, json!({ "some": "data" }));
            Ok::<(), HandlerFailure>(())
        });

        assert!(handler.handle(json!({ "some": "data" })).await.is_ok());
    }

    #[tokio::test]
    async fn test_sync_fn_event_handler_failure() {
        let handler = SyncFnEventHandler(|_data: Value| -> Result<(), HandlerFailure> {
            Err(HandlerFailure::from("Error!"))
        });

        let failure = handler.handle(Value::Null).await.unwrap_err();
        assert_eq!(failure.reason(), &json!("Error!"));
    }

    #[tokio::test]
    async fn test_invoke_captures_panic_message() {
        let handler = SyncFnEventHandler(|_data: Value| -> Result<(), HandlerFailure> {
            panic!("handler blew up")
        });

        let failure = invoke(&handler, Value::Null).await.unwrap_err();
        assert_eq!(failure.reason(), &json!("handler blew up"));
    }

    #[tokio::test]
    async fn test_invoke_captures_formatted_panic() {
        let handler = FnEventHandler(|data: Value| async move {
            if data.is_null() {
                panic!("missing {}", "data");
            }
            Ok::<(), HandlerFailure>(())
        });

        let failure = invoke(&handler, Value::Null).await.unwrap_err();
        assert_eq!(failure.reason(), &json!("missing data"));
    }
}
