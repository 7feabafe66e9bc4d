use std::time::Duration;

use actix_web::{App, HttpServer, dev::ServerHandle, http::StatusCode, test, web};
use battlestation_runtime::Generation;
use battlestation_server::{CannonEndpoint, ServerConfig, build_state, configure};
use mock_ion_cannon::MockCannon;
use serde_json::{Value, json};

/// Boots a mock cannon on an ephemeral port and returns its base URL.
fn spawn_cannon(generation: Generation) -> (String, ServerHandle) {
    let cannon = web::Data::new(MockCannon::new(generation.number(), generation.cooldown()));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(cannon.clone())
            .configure(mock_ion_cannon::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock cannon");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}

fn config(cannons: Vec<CannonEndpoint>) -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        cannons,
        request_timeout: Duration::from_secs(2),
        cannon_http_timeout: Duration::from_millis(500),
        log_dir: None,
    }
}

fn scan() -> Value {
    json!([
        { "coordinates": { "x": 0, "y": 40 }, "enemies": { "type": "soldier", "number": 10 } },
        { "coordinates": { "x": 0, "y": 80 }, "enemies": { "type": "mech", "number": 1 } }
    ])
}

/// Drives the real HTTP client against live mock cannons: the first attack
/// lands on generation 1, the second falls through to generation 2 while
/// generation 1 is cooling down.
#[actix_web::test]
async fn attacks_rotate_through_live_cannons() {
    let mut handles = Vec::new();
    let mut endpoints = Vec::new();
    for generation in [Generation::First, Generation::Second] {
        let (url, handle) = spawn_cannon(generation);
        endpoints.push(CannonEndpoint { generation, url });
        handles.push(handle);
    }

    let state = web::Data::new(build_state(&config(endpoints)).expect("state"));
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/attack")
        .set_json(json!({ "protocols": ["avoid-mech"], "scan": scan() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "target": { "x": 0, "y": 40 }, "casualties": 10, "generation": 1 })
    );

    let req = test::TestRequest::post()
        .uri("/attack")
        .set_json(json!({ "protocols": ["prioritize-mech"], "scan": scan() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "target": { "x": 0, "y": 80 }, "casualties": 1, "generation": 2 })
    );

    let req = test::TestRequest::get().uri("/status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let cannons = body["cannons"].as_array().expect("cannon list");
    assert_eq!(cannons.len(), 2);
    assert!(cannons.iter().all(|c| c["locally_available"] == json!(false)));
    assert_eq!(cannons[1]["status"]["generation"], json!(2));

    for handle in handles {
        handle.stop(true).await;
    }
}

/// A configured cannon that is not running makes the pool unavailable.
#[actix_web::test]
async fn unreachable_cannons_are_service_unavailable() {
    let endpoints = vec![CannonEndpoint {
        generation: Generation::First,
        url: "http://127.0.0.1:9".to_string(),
    }];
    let state = web::Data::new(build_state(&config(endpoints)).expect("state"));
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/attack")
        .set_json(json!({ "protocols": ["closest-enemies"], "scan": scan() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some_and(|e| e.contains("probes failed")));
}
