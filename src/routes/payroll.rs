use actix_web::web;

use crate::handlers::{advances, payments, salary};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/salary")
            .route("/{worker_id}", web::get().to(salary::get_salary))
            .route("/{worker_id}/accruals", web::get().to(salary::get_accruals)),
    )
    .service(
        web::scope("/advances")
            .route("", web::post().to(advances::record_advance))
            .route("/{worker_id}", web::get().to(advances::get_advances))
            .route("/{worker_id}/today", web::get().to(advances::get_today_total)),
    )
    .service(
        web::scope("/payments")
            .route("", web::post().to(payments::record_payment))
            .route("/{worker_id}", web::get().to(payments::get_payments)),
    );
}
