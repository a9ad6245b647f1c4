use actix_web::{App, http::StatusCode, test};
use serde_json::json;

use worksite::database::models::{AttendanceReport, CreateWorkerInput, PayrollReport};

mod common;

use common::{TestContext, assert_success, bearer};

#[actix_web::test]
async fn test_reports_cover_visible_workers() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.register("owner@example.com").await.unwrap();
    let mason = ctx.create_named_worker(&owner, "Mason").await.unwrap();
    let helper = ctx
        .create_worker(
            &owner,
            CreateWorkerInput {
                name: "Helper".to_string(),
                daily_rate: Some(400.0),
                ..CreateWorkerInput::default()
            },
        )
        .await
        .unwrap();
    let retired = ctx.create_named_worker(&owner, "Retired").await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let marks = [
        (&mason.id, "2025-03-01", "present"),
        (&mason.id, "2025-03-02", "half"),
        (&mason.id, "2025-03-03", "absent"),
        (&mason.id, "2025-03-04", "holiday"),
        (&helper.id, "2025-03-01", "present"),
        (&retired.id, "2025-03-01", "present"),
    ];
    for (worker_id, date, status) in marks {
        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .insert_header(bearer(&owner.token))
            .set_json(json!({"worker_id": worker_id, "date": date, "status": status}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/advances")
        .insert_header(bearer(&owner.token))
        .set_json(json!({"worker_id": mason.id, "amount": 100.0, "date": "2025-03-02"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/workers/{}/hidden", retired.id))
        .insert_header(bearer(&owner.token))
        .set_json(json!({"hidden": true}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/reports/attendance?date_from=2025-03-01&date_to=2025-03-31")
        .insert_header(bearer(&owner.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let report: AttendanceReport = assert_success(&body);

    assert_eq!(report.total_workers, 2);
    assert_eq!(report.total_present, 3);
    assert_eq!(report.total_absent, 1);
    assert_eq!(report.attendance_rate, 75.0);
    let mason_stats = report
        .workers
        .iter()
        .find(|w| w.worker_id == mason.id)
        .unwrap();
    assert_eq!(mason_stats.working_days, 3);
    assert_eq!(mason_stats.attendance_percentage, 66.67);

    let req = test::TestRequest::get()
        .uri("/api/reports/payroll?date_from=2025-03-01&date_to=2025-03-31")
        .insert_header(bearer(&owner.token))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let report: PayrollReport = assert_success(&body);

    assert_eq!(report.workers.len(), 2);
    assert_eq!(report.gross_earnings, 1150.0);
    assert_eq!(report.total_advances, 100.0);
    assert_eq!(report.net_payable, 1050.0);
}

#[actix_web::test]
async fn test_report_requires_range() {
    let ctx = TestContext::new().await.unwrap();
    let owner = ctx.register("owner@example.com").await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri("/api/reports/payroll?date_from=2025-03-01")
        .insert_header(bearer(&owner.token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
