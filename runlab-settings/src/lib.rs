//! User-settings store for the Runlab client.
//!
//! Maintains a path-keyed, in-memory cache of settings values, mediating
//! all reads and writes through caller-supplied codecs while persisting
//! changes to the remote settings service.
//!
//! # Architecture
//!
//! - **Store**: synchronous, codec-validated access to the settings table;
//!   reads return [`Loadable`](runlab_types::Loadable) values and never
//!   touch the network
//! - **Service**: the asynchronous remote persistence contract, with a
//!   mock for tests and an HTTP implementation for production
//! - **Events**: a broadcast stream of table changes for observers
//!
//! Writes are local-first: the table is updated synchronously and the
//! remote call runs on a detached task. A persistence failure is reported
//! to the store's [`ErrorSink`] and the local value stays authoritative.

mod error;
mod http;
pub mod service;
mod store;

pub use error::{ServiceError, ServiceResult, SettingsError, SettingsResult};
pub use http::{HttpServiceConfig, HttpSettingsService};
pub use service::SettingsService;
pub use store::{ErrorSink, LogSink, SettingsEvent, SettingsStore};
