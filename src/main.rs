use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger};
use anyhow::Result;
use std::sync::Arc;

use worksite::database::init_database;
use worksite::middleware::RequestId;
use worksite::store::{FileStore, WorkerStore, spawn_day_watcher, watcher::DAY_CHECK_INTERVAL};
use worksite::{AppData, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Worksite Manager API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

fn cors(config: &Config) -> Cors {
    let cors = if config.allows_any_origin() {
        Cors::default().allow_any_origin()
    } else {
        Cors::default().allowed_origin(&config.cors_origin)
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            "Authorization",
            "Content-Type",
            "Accept",
            "X-Requested-With",
            "X-Correlation-ID",
        ])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting Worksite Manager API server...");

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let local_store = WorkerStore::new(Arc::new(FileStore::new(&config.local_store_dir)));
    let day_watcher = spawn_day_watcher(local_store, DAY_CHECK_INTERVAL);

    let app_data = AppData::new(pool, config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    let result = HttpServer::new(move || {
        let app_data = app_data.clone();
        App::new()
            .configure(move |cfg| app_data.configure(cfg))
            .wrap(cors(&config))
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e));

    day_watcher.abort();
    result
}
