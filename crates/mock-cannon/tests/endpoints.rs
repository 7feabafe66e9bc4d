use std::time::Duration;

use actix_web::{App, http::StatusCode, test, web};
use mock_ion_cannon::{MockCannon, configure};
use serde_json::{Value, json};

fn fire_order(enemies: i32) -> Value {
    json!({ "target": { "x": 0, "y": 40 }, "enemies": enemies })
}

#[actix_web::test]
async fn fire_reports_every_enemy_and_starts_cooldown() {
    let cannon = web::Data::new(MockCannon::new(2, Duration::from_secs(60)));
    let app = test::init_service(App::new().app_data(cannon.clone()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "generation": 2, "available": true }));

    let req = test::TestRequest::post()
        .uri("/fire")
        .set_json(fire_order(10))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "casualties": 10, "generation": 2 }));

    assert!(!cannon.is_available());
    let req = test::TestRequest::get().uri("/status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["available"], json!(false));

    let req = test::TestRequest::post()
        .uri("/fire")
        .set_json(fire_order(3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Cannon not available");
}

#[actix_web::test]
async fn malformed_order_leaves_cannon_ready() {
    let cannon = web::Data::new(MockCannon::new(1, Duration::from_secs(60)));
    let app = test::init_service(App::new().app_data(cannon.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/fire")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"target\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(cannon.is_available());
}

#[actix_web::test]
async fn cooldown_expires_after_fire_time() {
    let cannon = web::Data::new(MockCannon::new(3, Duration::from_millis(50)));
    let app = test::init_service(App::new().app_data(cannon.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/fire")
        .set_json(fire_order(1))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(!cannon.is_available());

    actix_web::rt::time::sleep(Duration::from_millis(80)).await;
    assert!(cannon.is_available());
}
