//! The settings store.
//!
//! An in-memory, path-keyed cache of untyped JSON settings values. Every
//! read and write goes through a caller-supplied codec; every write is
//! replicated to the remote service on a detached task. Local state is
//! authoritative: a failed remote call is reported, never rolled back.

use crate::error::{ServiceError, SettingsError, SettingsResult};
use crate::service::SettingsService;
use runlab_codec::{Codec, DecodeError};
use runlab_types::{Loadable, SettingsPath, UserId};
use serde_json::{Map as JsonMap, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

/// Capacity of the change-notification channel. Slow subscribers that fall
/// further behind than this miss events; the stream is a notification, not
/// a durable log.
const EVENT_CAPACITY: usize = 64;

/// Receives persistence failures.
///
/// Called from the persistence task after a remote write fails. The local
/// table already holds the new value and keeps it.
pub trait ErrorSink: Send + Sync {
    /// `path` is `None` for failures of whole-table resets.
    fn persistence_failed(&self, path: Option<&SettingsPath>, error: &ServiceError);
}

/// Default sink: logs the failure and moves on.
pub struct LogSink;

impl ErrorSink for LogSink {
    fn persistence_failed(&self, path: Option<&SettingsPath>, error: &ServiceError) {
        tracing::warn!(path = path.map(SettingsPath::as_str), %error, "settings persistence failed");
    }
}

/// A change to the settings table.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    /// The whole table was replaced by hydration.
    Hydrated,
    /// The value at a path changed.
    Updated(SettingsPath),
    /// The value at a path was removed.
    Removed(SettingsPath),
    /// The whole table was cleared.
    Cleared,
    /// A remote persistence call failed; `None` means a reset-all.
    PersistFailed(Option<SettingsPath>),
}

enum PersistOp {
    Update { path: SettingsPath, value: Value },
    Remove { path: SettingsPath },
    ResetAll,
}

/// Path-keyed settings cache with codec-validated access and asynchronous
/// remote persistence.
///
/// The store is scoped to one authenticated user and exclusively owns its
/// table. Reads are synchronous and never touch the network; writes update
/// the table synchronously (immediately visible to subsequent reads) and
/// replicate to the remote service on a spawned task. Construct inside a
/// tokio runtime.
///
/// # Example
///
/// ```
/// use runlab_codec::Shape;
/// use runlab_settings::SettingsStore;
/// use runlab_settings::service::mock::MockSettingsService;
/// use runlab_types::{Loadable, SettingsPath, UserId};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = SettingsStore::new(UserId::new(), Arc::new(MockSettingsService::new()));
/// let path = SettingsPath::new("chart-scale").unwrap();
///
/// store.set(&Shape::String, &path, &json!("log")).unwrap();
/// assert_eq!(store.get(&Shape::String, &path), Loadable::Loaded(json!("log")));
///
/// store.flush().await;
/// # }
/// ```
pub struct SettingsStore {
    user_id: UserId,
    table: RwLock<HashMap<SettingsPath, Value>>,
    service: Arc<dyn SettingsService>,
    sink: Arc<dyn ErrorSink>,
    events: broadcast::Sender<SettingsEvent>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl SettingsStore {
    /// Creates an empty store for a user, logging persistence failures.
    pub fn new(user_id: UserId, service: Arc<dyn SettingsService>) -> Self {
        Self::with_sink(user_id, service, Arc::new(LogSink))
    }

    /// Creates an empty store with a custom persistence-failure sink.
    pub fn with_sink(
        user_id: UserId,
        service: Arc<dyn SettingsService>,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            user_id,
            table: RwLock::new(HashMap::new()),
            service,
            sink,
            events,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// The user this store belongs to.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Subscribes to table changes and persistence failures.
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        self.events.subscribe()
    }

    /// Number of paths currently stored.
    pub fn len(&self) -> usize {
        self.read_table().len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.read_table().is_empty()
    }

    /// Whether a value is stored at a path.
    pub fn contains(&self, path: &SettingsPath) -> bool {
        self.read_table().contains_key(path)
    }

    /// Replaces the entire table. Used for startup hydration and test
    /// setup; does not touch the remote service.
    pub fn overwrite(&self, initial: HashMap<SettingsPath, Value>) {
        *self.write_table() = initial;
        debug!(user = %self.user_id, "settings table overwritten");
        let _ = self.events.send(SettingsEvent::Hydrated);
    }

    /// Hydrates the table from the remote service.
    pub async fn load(&self) -> SettingsResult<()> {
        let settings = self.service.fetch_all().await?;
        debug!(user = %self.user_id, count = settings.len(), "settings hydrated from service");
        self.overwrite(settings);
        Ok(())
    }

    /// Reads and decodes the value at a path.
    ///
    /// Returns `NotLoaded` when nothing is stored, `Failed` when the stored
    /// value does not match the codec. Never touches the network.
    pub fn get<C: Codec>(&self, codec: &C, path: &SettingsPath) -> Loadable<C::Output, DecodeError> {
        match self.read_table().get(path) {
            None => Loadable::NotLoaded,
            Some(raw) => codec.decode(raw).into(),
        }
    }

    /// Encodes and stores a value at a path (full replace), then persists
    /// it remotely on a detached task.
    ///
    /// The new value is visible to `get` as soon as this returns; only
    /// remote durability is asynchronous.
    pub fn set<C: Codec>(
        &self,
        codec: &C,
        path: &SettingsPath,
        value: &C::Output,
    ) -> SettingsResult<()> {
        let raw = codec.encode(value)?;
        self.store_raw(path, raw);
        Ok(())
    }

    /// Shallow-merges a partial object over the value at a path.
    ///
    /// The base is the currently stored object, or an empty object when
    /// nothing (or a non-object) is stored — which a partial shape
    /// tolerates. The merged result must validate against the codec or the
    /// write is rejected and the table is left unchanged.
    pub fn set_partial<C: Codec>(
        &self,
        codec: &C,
        path: &SettingsPath,
        partial: JsonMap<String, Value>,
    ) -> SettingsResult<()> {
        let mut merged = match self.read_table().get(path) {
            Some(Value::Object(fields)) => fields.clone(),
            _ => JsonMap::new(),
        };
        for (field, value) in partial {
            merged.insert(field, value);
        }

        let decoded = codec.decode(&Value::Object(merged))?;
        let raw = codec.encode(&decoded)?;
        self.store_raw(path, raw);
        Ok(())
    }

    /// Applies an updater to the current decoded value and stores the
    /// result through the same path as [`set`](Self::set).
    ///
    /// Fails with `NotLoaded` when nothing is stored at the path.
    pub fn update<C: Codec>(
        &self,
        codec: &C,
        path: &SettingsPath,
        updater: impl FnOnce(C::Output) -> C::Output,
    ) -> SettingsResult<()> {
        let current = match self.get(codec, path) {
            Loadable::Loaded(value) => value,
            Loadable::NotLoaded => return Err(SettingsError::NotLoaded(path.clone())),
            Loadable::Failed(error) => return Err(error.into()),
        };
        self.set(codec, path, &updater(current))
    }

    /// Removes the value at a path and resets the remote copy.
    pub fn remove(&self, path: &SettingsPath) {
        let removed = self.write_table().remove(path).is_some();
        if removed {
            debug!(user = %self.user_id, path = %path, "setting removed");
            let _ = self.events.send(SettingsEvent::Removed(path.clone()));
        }
        // The remote copy may exist even when the local one does not.
        self.spawn_persist(PersistOp::Remove { path: path.clone() });
    }

    /// Clears the table and resets every remote setting.
    pub fn reset(&self) {
        self.write_table().clear();
        debug!(user = %self.user_id, "settings reset");
        let _ = self.events.send(SettingsEvent::Cleared);
        self.spawn_persist(PersistOp::ResetAll);
    }

    /// Awaits every in-flight persistence task.
    ///
    /// Writes are fire-and-forget by default; callers that need durability
    /// confirmation call this.
    pub async fn flush(&self) {
        let handles = std::mem::take(&mut *self.pending_lock());
        for handle in handles {
            let _ = handle.await;
        }
    }

    fn store_raw(&self, path: &SettingsPath, raw: Value) {
        self.write_table().insert(path.clone(), raw.clone());
        debug!(user = %self.user_id, path = %path, "setting updated");
        let _ = self.events.send(SettingsEvent::Updated(path.clone()));
        self.spawn_persist(PersistOp::Update {
            path: path.clone(),
            value: raw,
        });
    }

    fn spawn_persist(&self, op: PersistOp) {
        let service = Arc::clone(&self.service);
        let sink = Arc::clone(&self.sink);
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let (path, result) = match op {
                PersistOp::Update { path, value } => {
                    let result = service.persist(&path, &value).await;
                    (Some(path), result)
                }
                PersistOp::Remove { path } => {
                    let result = service.remove(&path).await;
                    (Some(path), result)
                }
                PersistOp::ResetAll => (None, service.reset_all().await),
            };

            if let Err(error) = result {
                sink.persistence_failed(path.as_ref(), &error);
                let _ = events.send(SettingsEvent::PersistFailed(path));
            }
        });

        let mut pending = self.pending_lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    // A poisoned lock only means a panicked holder; every mutation is a
    // single map operation, so the table is still consistent.
    fn read_table(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SettingsPath, Value>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SettingsPath, Value>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending_lock(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
