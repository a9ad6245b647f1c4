pub mod advance;
pub mod attendance;
pub mod auth;
pub mod cashbook;
pub(crate) mod macros;
pub mod payment;
pub mod report;
pub mod site;
pub mod subscription;
pub mod user;
pub mod worker;

// Re-export all models for easy importing
pub use advance::*;
pub use attendance::*;
pub use auth::*;
pub use cashbook::*;
pub use payment::*;
pub use report::*;
pub use site::*;
pub use subscription::*;
pub use user::*;
pub use worker::*;
