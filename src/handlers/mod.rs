pub mod advances;
pub mod attendance;
pub mod auth;
pub mod cashbook;
pub mod payments;
pub mod reports;
pub mod salary;
pub mod shared;
pub mod sites;
pub mod subscription;
pub mod workers;
