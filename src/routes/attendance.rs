use actix_web::web;

use crate::handlers::attendance;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("", web::post().to(attendance::mark_attendance))
            .route("/toggle", web::post().to(attendance::toggle_attendance))
            .route(
                "/{worker_id}",
                web::get().to(attendance::get_worker_attendance),
            )
            .route(
                "/{attendance_id}",
                web::put().to(attendance::update_attendance),
            ),
    );
}
