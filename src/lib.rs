pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payroll;
pub mod routes;
pub mod services;
pub mod store;

use actix_web::web;
use sqlx::SqlitePool;

pub use config::Config;
pub use database::repositories::{
    AdvanceRepository, AttendanceRepository, CashbookRepository, PaymentRepository,
    SiteRepository, SubscriptionRepository, UserRepository, WorkerRepository,
};
pub use services::{AuthService, ReportService, SubscriptionService};

pub struct AppState {
    pub auth_service: AuthService,
    pub subscription_service: SubscriptionService,
    pub report_service: ReportService,
}

/// Shared application data. Build once and hand a clone to every
/// worker so the services (and their caches) are shared.
#[derive(Clone)]
pub struct AppData {
    config: web::Data<Config>,
    state: web::Data<AppState>,
    sites: web::Data<SiteRepository>,
    workers: web::Data<WorkerRepository>,
    attendance: web::Data<AttendanceRepository>,
    advances: web::Data<AdvanceRepository>,
    payments: web::Data<PaymentRepository>,
    cashbook: web::Data<CashbookRepository>,
}

impl AppData {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let user_repository = UserRepository::new(pool.clone());
        let site_repository = SiteRepository::new(pool.clone());
        let worker_repository = WorkerRepository::new(pool.clone());
        let attendance_repository = AttendanceRepository::new(pool.clone());
        let advance_repository = AdvanceRepository::new(pool.clone());
        let subscription_repository = SubscriptionRepository::new(pool.clone());

        let state = AppState {
            auth_service: AuthService::new(user_repository, config.clone()),
            subscription_service: SubscriptionService::new(
                subscription_repository,
                site_repository.clone(),
                worker_repository.clone(),
            ),
            report_service: ReportService::new(
                worker_repository.clone(),
                attendance_repository.clone(),
                advance_repository.clone(),
            ),
        };

        Self {
            config: web::Data::new(config),
            state: web::Data::new(state),
            sites: web::Data::new(site_repository),
            workers: web::Data::new(worker_repository),
            attendance: web::Data::new(attendance_repository),
            advances: web::Data::new(advance_repository),
            payments: web::Data::new(PaymentRepository::new(pool.clone())),
            cashbook: web::Data::new(CashbookRepository::new(pool)),
        }
    }

    /// Registers app data and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.state.clone())
            .app_data(self.sites.clone())
            .app_data(self.workers.clone())
            .app_data(self.attendance.clone())
            .app_data(self.advances.clone())
            .app_data(self.payments.clone())
            .app_data(self.cashbook.clone())
            .configure(routes::configure);
    }
}
