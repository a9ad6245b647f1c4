pub mod auth;
pub mod reports;
pub mod subscription;

pub use auth::{AuthService, Claims};
pub use reports::ReportService;
pub use subscription::SubscriptionService;
