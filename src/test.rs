use std::sync::Arc;
use std::time::Duration;

use actix::SyncArbiter;
use actix_web::web::Data;
use actix_web::{http::StatusCode, test, App};
use chrono::{Days, Utc};
use serde_json::{json, Value};

use crate::services;
use crate::services::cache_handling::MemoryCache;
use crate::services::db_utils::{create_tables, get_memory_pool, AppState, DbActor};
use crate::services::messages::SeedDemoChain;

async fn test_state(seeded: bool) -> Data<AppState> {
    let pool = get_memory_pool().unwrap();
    create_tables(&pool).unwrap();
    let db = SyncArbiter::start(1, move || DbActor(pool.clone()));

    if seeded {
        db.send(SeedDemoChain).await.unwrap().unwrap();
    }

    Data::new(AppState {
        db,
        cache: Arc::new(MemoryCache::default()),
        orders_ttl: Duration::from_secs(60),
    })
}

macro_rules! test_app {
    ($seeded:expr) => {
        test::init_service(
            App::new()
                .app_data(test_state($seeded).await)
                .configure(services::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn cash_register_chains_cashier_to_region() {
    let app = test_app!(true);

    for _ in 0..20 {
        let req = test::TestRequest::get().uri("/cashregister").to_request();
        let sale: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(sale["locationName"], "Le Pain");
        assert_eq!(sale["locationCity"], "Paris");
        assert_eq!(sale["locationRegion"], "Île-de-France");
        assert_eq!(sale["cashierName"], "Alice");
        assert!(sale["purchaseDate"].is_string());

        let basket = sale["purchaseBasket"].as_array().unwrap();
        assert!((1..=2).contains(&basket.len()));
        for line in basket {
            match line["item"].as_str().unwrap() {
                "Croissant" => assert_eq!(line["price"], 1.20),
                "Baguette" => assert_eq!(line["price"], 1.00),
                other => panic!("unexpected item {other}"),
            }
            assert!((1..=5).contains(&line["qty"].as_i64().unwrap()));
        }
    }
}

#[actix_web::test]
async fn cash_register_reports_empty_tables() {
    let app = test_app!(false);

    let req = test::TestRequest::get().uri("/cashregister").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn orders_are_replayed_from_cache() {
    let app = test_app!(true);

    let req = test::TestRequest::get().uri("/orders").to_request();
    let first = test::call_and_read_body(&app, req).await;
    let req = test::TestRequest::get().uri("/orders").to_request();
    let second = test::call_and_read_body(&app, req).await;
    assert_eq!(first, second);

    let bill: Value = serde_json::from_slice(&first).unwrap();
    let orders = bill["orders"].as_array().unwrap();
    assert!((1..=5).contains(&orders.len()));
    for order in orders {
        assert_eq!(order["locationName"], "Le Pain");
        assert!(order["deliveryDate"].is_string());
        assert!(order.get("cashierName").is_none());
    }
}

#[actix_web::test]
async fn time_series_write_is_an_upsert() {
    let app = test_app!(true);

    for value in [10.0, 42.5] {
        let req = test::TestRequest::post()
            .uri("/bakeries/timeseries")
            .set_json(json!({ "id": 1, "type": "revenue", "value": value, "date": "2026-10-19T08:00:00" }))
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack["target"], "bakery");
        assert_eq!(ack["id"], 1);
    }

    let req = test::TestRequest::get()
        .uri("/bakeries/timeseries?id=1&type=revenue")
        .to_request();
    let series: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(series, json!({ "data": [{ "date": "2026-10-19T08:00:00", "value": 42.5 }] }));
}

#[actix_web::test]
async fn time_series_dates_with_offsets_are_stored_as_utc() {
    let app = test_app!(true);

    for date in ["2026-10-19T08:00:00Z", "2026-10-19T10:00:00+02:00"] {
        let req = test::TestRequest::post()
            .uri("/cities/timeseries")
            .set_json(json!({ "id": 1, "type": "footfall", "value": 7.0, "date": date }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/cities/timeseries")
        .set_json(json!({ "id": 1, "type": "footfall", "value": 7.0, "date": "tomorrow" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/cities/timeseries?id=1&type=footfall")
        .to_request();
    let series: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(series, json!({ "data": [{ "date": "2026-10-19T08:00:00", "value": 7.0 }] }));
}

#[actix_web::test]
async fn time_series_read_returns_every_timestamp() {
    let app = test_app!(true);
    let points = [("2026-10-17T08:00:00", 1.0), ("2026-10-18T08:00:00", 2.0), ("2026-10-19T08:00:00", 3.0)];

    for (date, value) in points {
        let req = test::TestRequest::post()
            .uri("/cities/timeseries")
            .set_json(json!({ "id": 7, "type": "footfall", "value": value, "date": date }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    // Same id and series on another entity type stays separate.
    let req = test::TestRequest::post()
        .uri("/regions/timeseries")
        .set_json(json!({ "id": 7, "type": "footfall", "value": 99.0, "date": "2026-10-19T08:00:00" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/cities/timeseries?id=7&type=footfall")
        .to_request();
    let series: Value = test::call_and_read_body_json(&app, req).await;
    let data = series["data"].as_array().unwrap();
    assert_eq!(data.len(), points.len());
    for (date, value) in points {
        assert!(data.iter().any(|p| p["date"] == date && p["value"] == value));
    }
}

#[actix_web::test]
async fn time_series_is_limited_to_reference_entities() {
    let app = test_app!(true);

    let req = test::TestRequest::get()
        .uri("/items/timeseries?id=1&type=stock")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn past_factory_orders_are_rejected() {
    let app = test_app!(true);
    let yesterday = Utc::now().date_naive().checked_sub_days(Days::new(1)).unwrap();

    let req = test::TestRequest::post()
        .uri("/factory/next-day-order")
        .set_json(json!({ "bakery": "Le Pain", "product": "Baguette", "quantity": 30, "date": yesterday }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/factory/next-day-order?date={yesterday}"))
        .to_request();
    let day: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(day["orders"], json!([]));
}

#[actix_web::test]
async fn factory_orders_need_a_positive_quantity() {
    let app = test_app!(true);
    let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();

    for quantity in [0, -5] {
        let req = test::TestRequest::post()
            .uri("/factory/next-day-order")
            .set_json(json!({ "bakery": "Le Pain", "product": "Baguette", "quantity": quantity, "date": tomorrow }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/factory/next-day-order?date={tomorrow}"))
        .to_request();
    let day: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(day["orders"], json!([]));
}

#[actix_web::test]
async fn duplicate_factory_orders_are_silently_dropped() {
    let app = test_app!(true);
    let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();

    for quantity in [30, 99] {
        let req = test::TestRequest::post()
            .uri("/factory/next-day-order")
            .set_json(json!({ "bakery": "Le Pain", "product": "Baguette", "quantity": quantity, "date": tomorrow }))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert!(resp["message"].is_string());
    }

    let req = test::TestRequest::post()
        .uri("/factory/next-day-order")
        .set_json(json!({ "bakery": "Le Pain", "product": "Croissant", "quantity": 12, "date": tomorrow }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/factory/next-day-order?date={tomorrow}"))
        .to_request();
    let day: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(day["date"], tomorrow.to_string());
    assert_eq!(
        day["orders"],
        json!([{
            "locationName": "Le Pain",
            "orderBasket": [{ "item": "Baguette", "qty": 30 }, { "item": "Croissant", "qty": 12 }]
        }])
    );
}

#[actix_web::test]
async fn factory_orders_need_known_bakery_and_product() {
    let app = test_app!(true);
    let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();

    let req = test::TestRequest::post()
        .uri("/factory/next-day-order")
        .set_json(json!({ "bakery": "Nowhere", "product": "Baguette", "quantity": 3, "date": tomorrow }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn resource_lookup_resolves_names() {
    let app = test_app!(true);

    let req = test::TestRequest::post()
        .uri("/bakeries/resource")
        .set_json(json!({ "name": "Le Pain" }))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert!(found["id"].as_i64().is_some());

    let req = test::TestRequest::post()
        .uri("/items/resource")
        .set_json(json!({ "name": "Croissant" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/cashiers/resource")
        .set_json(json!({ "name": "Bob" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let message: Value = test::read_body_json(resp).await;
    assert_eq!(message, "unknown cashier");

    let req = test::TestRequest::post()
        .uri("/unicorns/resource")
        .set_json(json!({ "name": "Sparkle" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn mock_bakery_seeding_is_idempotent() {
    let app = test_app!(true);

    let req = test::TestRequest::post().uri("/test/create-mock-bakery").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/test/healthcheck").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
