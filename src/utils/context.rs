use std::sync::Arc;
use parking_lot::RwLock;
use chrono::{DateTime, Duration, Utc};
use crate::db::store::UserStore;
use crate::utils::{config::Configuration, time_provider::TimeProvider};

///
/// The context is handed to every service call and gives it access to the user store, config and clock.
///
pub struct ServiceContext {
    store: Arc<dyn UserStore>,
    config: Configuration,
    time_provider: RwLock<TimeProvider>,
}

impl ServiceContext {
    pub fn new(config: Configuration, store: Arc<dyn UserStore>) -> Self {
        ServiceContext {
            store,
            config,
            time_provider: RwLock::new(TimeProvider::default()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.time_provider.read().now()
    }

    ///
    /// Set or clear the fixed time.
    ///
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        self.time_provider.write().fix(now);
    }

    pub fn advance_time(&self, duration: Duration) {
        self.time_provider.write().advance(duration);
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}
