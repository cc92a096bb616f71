//! Remote settings service abstraction.
//!
//! Defines the asynchronous contract the store persists through, allowing
//! it to work with any backend (HTTP API, test double).

use crate::error::ServiceResult;
use async_trait::async_trait;
use runlab_types::SettingsPath;
use serde_json::Value;
use std::collections::HashMap;

/// The remote persistence backend for one user's settings.
///
/// Implementations are scoped to an authenticated user; the store never
/// passes user identity per call.
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Fetches every persisted setting.
    async fn fetch_all(&self) -> ServiceResult<HashMap<SettingsPath, Value>>;

    /// Persists the value at one path (full replace).
    async fn persist(&self, path: &SettingsPath, value: &Value) -> ServiceResult<()>;

    /// Removes the persisted value at one path.
    async fn remove(&self, path: &SettingsPath) -> ServiceResult<()>;

    /// Clears every persisted setting.
    async fn reset_all(&self) -> ServiceResult<()>;
}

/// A mock service for testing.
pub mod mock {
    use super::*;
    use crate::error::ServiceError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// One recorded service invocation.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ServiceCall {
        FetchAll,
        Persist { path: SettingsPath, value: Value },
        Remove { path: SettingsPath },
        ResetAll,
    }

    /// A mock settings service that records calls and can fail writes.
    #[derive(Debug, Default)]
    pub struct MockSettingsService {
        settings: Mutex<HashMap<SettingsPath, Value>>,
        calls: Mutex<Vec<ServiceCall>>,
        fail_writes: AtomicBool,
    }

    impl MockSettingsService {
        /// Creates an empty mock service.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a mock service pre-populated with settings.
        pub fn with_settings(settings: HashMap<SettingsPath, Value>) -> Self {
            Self {
                settings: Mutex::new(settings),
                ..Self::default()
            }
        }

        /// Makes every subsequent write call fail with a network error.
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Returns all recorded calls in order.
        pub fn calls(&self) -> Vec<ServiceCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Returns the number of recorded calls.
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Returns the value currently persisted at a path.
        pub fn persisted(&self, path: &SettingsPath) -> Option<Value> {
            self.settings.lock().unwrap().get(path).cloned()
        }

        fn record(&self, call: ServiceCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn check_write(&self) -> ServiceResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(ServiceError::Network("mock write failure".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SettingsService for MockSettingsService {
        async fn fetch_all(&self) -> ServiceResult<HashMap<SettingsPath, Value>> {
            self.record(ServiceCall::FetchAll);
            Ok(self.settings.lock().unwrap().clone())
        }

        async fn persist(&self, path: &SettingsPath, value: &Value) -> ServiceResult<()> {
            self.record(ServiceCall::Persist {
                path: path.clone(),
                value: value.clone(),
            });
            self.check_write()?;
            self.settings.lock().unwrap().insert(path.clone(), value.clone());
            Ok(())
        }

        async fn remove(&self, path: &SettingsPath) -> ServiceResult<()> {
            self.record(ServiceCall::Remove { path: path.clone() });
            self.check_write()?;
            self.settings.lock().unwrap().remove(path);
            Ok(())
        }

        async fn reset_all(&self) -> ServiceResult<()> {
            self.record(ServiceCall::ResetAll);
            self.check_write()?;
            self.settings.lock().unwrap().clear();
            Ok(())
        }
    }
}
