use actix_web::{HttpResponse, web};

pub mod attendance;
pub mod auth;
pub mod cashbook;
pub mod payroll;
pub mod reports;
pub mod subscription;
pub mod workers;

async fn banner() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Worksite Manager API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/", web::get().to(banner))
            .configure(auth::configure)
            .configure(workers::configure)
            .configure(attendance::configure)
            .configure(payroll::configure)
            .configure(cashbook::configure)
            .configure(subscription::configure)
            .configure(reports::configure),
    );
}
