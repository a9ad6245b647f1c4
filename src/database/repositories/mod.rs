pub mod advance;
pub mod attendance;
pub mod cashbook;
pub mod payment;
pub mod site;
pub mod subscription;
pub mod user;
pub mod worker;

// Re-export all repositories for easy importing
pub use advance::AdvanceRepository;
pub use attendance::AttendanceRepository;
pub use cashbook::{CashbookFilter, CashbookRepository};
pub use payment::PaymentRepository;
pub use site::SiteRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
pub use worker::{WorkerFilter, WorkerRepository};
