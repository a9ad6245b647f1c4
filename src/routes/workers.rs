use actix_web::web;

use crate::handlers::{sites, workers};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sites")
            .route("", web::post().to(sites::create_site))
            .route("", web::get().to(sites::get_sites)),
    )
    .service(
        web::scope("/workers")
            .route("", web::post().to(workers::create_worker))
            .route("", web::get().to(workers::get_workers))
            .route("/{id}", web::get().to(workers::get_worker))
            .route("/{id}", web::put().to(workers::update_worker))
            .route("/{id}", web::delete().to(workers::delete_worker))
            .route("/{id}/hidden", web::put().to(workers::set_hidden))
            .route("/{id}/overtime", web::post().to(workers::add_overtime))
            .route("/{id}/adjustments", web::post().to(workers::add_adjustment)),
    );
}
