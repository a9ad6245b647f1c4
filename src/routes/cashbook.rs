use actix_web::web;

use crate::handlers::cashbook;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cashbook")
            .route("", web::post().to(cashbook::create_entry))
            .route("", web::get().to(cashbook::get_entries))
            .route("/summary", web::get().to(cashbook::get_summary)),
    );
}
