use actix_web::{App, HttpServer, dev::ServerHandle};
use chrono::Local;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;

use worksite::client::{ApiClient, ClientError, OfflineClient, Synced};
use worksite::database::models::{
    AttendanceStatus, CreateUserInput, CreateWorkerInput, LoginInput,
};
use worksite::store::{FileStore, WorkerStore};

mod common;

use common::TestContext;

/// Serves the API on an ephemeral port.
fn spawn_server(ctx: &TestContext) -> (SocketAddr, ServerHandle) {
    let app_data = ctx.app_data.clone();
    let server = HttpServer::new(move || {
        let app_data = app_data.clone();
        App::new().configure(move |cfg| app_data.configure(cfg))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (addr, handle)
}

fn owner_input(email: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_string(),
        password: "password123".to_string(),
        name: "Site Owner".to_string(),
        company_name: None,
    }
}

#[actix_web::test]
async fn test_remote_first_then_local_after_outage() {
    let ctx = TestContext::new().await.unwrap();
    let (addr, handle) = spawn_server(&ctx);
    let store_dir = TempDir::new().unwrap();

    let api = ApiClient::new(format!("http://{}", addr));
    api.register(&owner_input("owner@example.com")).await.unwrap();
    let client = OfflineClient::new(
        api,
        WorkerStore::new(Arc::new(FileStore::new(store_dir.path()))),
    );

    let created = client
        .create_worker(CreateWorkerInput {
            name: "Lalremruata".to_string(),
            ..CreateWorkerInput::default()
        })
        .await
        .unwrap();
    let Synced::Remote(worker) = created else {
        panic!("expected the backend to accept the worker");
    };

    let today = Local::now().date_naive();
    let marked = client
        .toggle_attendance(&worker.id, today, AttendanceStatus::Present, worker.daily_rate)
        .await
        .unwrap();
    assert!(marked.is_remote());

    let advance = client.record_advance(&worker.id, today, 200.0).await.unwrap();
    assert!(advance.is_remote());

    let summary = client.api().salary(&worker.id, today, today).await.unwrap();
    assert_eq!(summary.daily_earnings, 500.0);
    assert_eq!(summary.net_payable, 300.0);

    handle.stop(true).await;

    let offline = client
        .toggle_attendance(&worker.id, today, AttendanceStatus::Half, worker.daily_rate)
        .await
        .unwrap();
    assert!(!offline.is_remote());

    let workers = client.store().load_workers().await;
    assert_eq!(
        workers[&worker.id].status_on(today),
        Some(AttendanceStatus::Half)
    );
    assert_eq!(workers[&worker.id].salary_on(today).map(|s| s.amount), Some(250.0));
}

#[actix_web::test]
async fn test_rejected_advance_is_not_recorded_locally() {
    let ctx = TestContext::new().await.unwrap();
    let (addr, handle) = spawn_server(&ctx);
    let store_dir = TempDir::new().unwrap();

    let api = ApiClient::new(format!("http://{}", addr));
    api.register(&owner_input("owner@example.com")).await.unwrap();
    let client = OfflineClient::new(
        api,
        WorkerStore::new(Arc::new(FileStore::new(store_dir.path()))),
    );

    let created = client
        .create_worker(CreateWorkerInput {
            name: "Capped".to_string(),
            max_advance_limit: Some(1000.0),
            ..CreateWorkerInput::default()
        })
        .await
        .unwrap();
    let Synced::Remote(worker) = created else {
        panic!("expected the backend to accept the worker");
    };

    let today = Local::now().date_naive();
    let result = client.record_advance(&worker.id, today, 5000.0).await;
    assert!(matches!(result, Err(ClientError::Api { status: 400, .. })));

    let result = client
        .toggle_attendance("no-such-worker", today, AttendanceStatus::Present, 500.0)
        .await;
    assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));

    assert!(client.store().load_workers().await.is_empty());
    assert_eq!(client.store().today_advance(today).await.unwrap().total, 0.0);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_session_survives_restart() {
    let ctx = TestContext::new().await.unwrap();
    ctx.register("owner@example.com").await.unwrap();
    let (addr, handle) = spawn_server(&ctx);
    let store_dir = TempDir::new().unwrap();

    let client = OfflineClient::new(
        ApiClient::new(format!("http://{}", addr)),
        WorkerStore::new(Arc::new(FileStore::new(store_dir.path()))),
    );
    let response = client
        .login(&LoginInput {
            email: "owner@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    // A fresh client over the same directory picks the session up.
    let reopened = OfflineClient::new(
        ApiClient::new(format!("http://{}", addr)),
        WorkerStore::new(Arc::new(FileStore::new(store_dir.path()))),
    );
    let session = reopened.restore_session().await.unwrap().unwrap();
    assert_eq!(session.user.id, response.user.id);
    assert_eq!(reopened.api().token().await, Some(response.access_token));

    let workers = reopened.api().list_workers().await.unwrap();
    assert!(workers.is_empty());

    reopened.logout().await.unwrap();
    assert!(reopened.restore_session().await.unwrap().is_none());

    handle.stop(true).await;
}
