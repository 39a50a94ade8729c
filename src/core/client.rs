use crate::core::consumer::Consumer;
use crate::core::error_bus::BusError;
use crate::core::settings::Settings;
use std::sync::Arc;

#[cfg(feature = "publisher")]
use crate::core::publisher::Publisher;

/// Consumer and publisher built from one set of settings.
#[derive(Clone)]
pub struct Client {
    consumer: Consumer,
    #[cfg(feature = "publisher")]
    publisher: Publisher,
}

impl Client {
    pub fn new(settings: Arc<Settings>) -> Result<Self, BusError> {
        Ok(Self {
            #[cfg(feature = "publisher")]
            publisher: Publisher::new(Arc::clone(&settings))?,
            consumer: Consumer::new(settings),
        })
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    #[cfg(feature = "publisher")]
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }
}
