use actix_web::web;

use crate::handlers::reports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/attendance", web::get().to(reports::attendance_report))
            .route("/payroll", web::get().to(reports::payroll_report)),
    );
}
