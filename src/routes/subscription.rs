use actix_web::web;

use crate::handlers::subscription;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscription")
            .route("", web::get().to(subscription::get_subscription))
            .route("", web::put().to(subscription::update_subscription)),
    );
}
