//! Device-local persistence.
//!
//! A [`KeyValueStore`] holds opaque string values under string keys. The
//! [`WorkerStore`] keeps the whole worker map as one JSON blob under
//! [`WORKERS_KEY`] and rewrites it on every change, plus a handful of
//! small single-key records (subscription, roster, session, today's
//! advance total).

pub mod file;
pub mod memory;
pub mod records;
pub mod watcher;
pub mod workers;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use records::{
    AuthSession, LocalAdvance, LocalAttendance, LocalPayment, LocalSalary, LocalSubscription,
    LocalWorker, RosterEntry, WorkerMap,
};
pub use watcher::spawn_day_watcher;
pub use workers::WorkerStore;

pub const WORKERS_KEY: &str = "worksite_workers";
pub const WORKER_LIST_KEY: &str = "worksite_worker_list";
pub const SUBSCRIPTION_KEY: &str = "worksite_subscription";
pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user";
pub const TODAY_ADVANCE_KEY: &str = "today_advance";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Payroll(#[from] crate::payroll::PayrollError),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
