//! HTTP access to the worksite API, with a local-store fallback.

pub mod api;
pub mod offline;

pub use api::{ApiClient, ClientError};
pub use offline::{OfflineClient, Synced};
