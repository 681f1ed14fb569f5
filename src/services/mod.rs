use actix_web::{get, web, HttpResponse, Responder};

pub mod cache_handling;
pub mod db_handling;
pub mod db_models;
pub mod db_utils;
pub mod insertable;
pub mod messages;
pub mod sale_generator;
pub mod troll;

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().body("Bakery chain demo backend")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home_page)
        .service(sales_route::cash_register)
        .service(sales_route::orders)
        .service(
            web::scope("/factory")
                .service(factory_route::fetch_next_day_orders)
                .service(factory_route::book_next_day_order),
        )
        .service(
            web::scope("/test")
                .service(test_route::healthcheck)
                .service(test_route::create_mock_bakery),
        )
        .service(timeseries_route::record_point)
        .service(timeseries_route::fetch_series)
        .service(resource_route::lookup_id);
}

// "/cashregister" and "/orders"
pub mod sales_route {
    use actix_web::http::header::ContentType;
    use actix_web::web::Data;
    use actix_web::{get, HttpResponse};
    use chrono::Utc;
    use tracing::warn;

    use crate::services::db_utils::AppState;
    use crate::services::messages::FetchSaleContext;
    use crate::services::sale_generator::{generate_order_bill, generate_sale};
    use crate::types::{ApiError, ORDERS_CACHE_KEY};

    #[get("/cashregister")]
    pub async fn cash_register(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
        let ctx = state.db.send(FetchSaleContext).await??;
        let sale = generate_sale(&ctx, &mut rand::thread_rng(), Utc::now())?;

        Ok(HttpResponse::Ok().json(sale))
    }

    #[get("/orders")]
    pub async fn orders(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
        match state.cache.get(ORDERS_CACHE_KEY) {
            Ok(Some(body)) => {
                return Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body))
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "orders cache unavailable"),
        }

        let ctx = state.db.send(FetchSaleContext).await??;
        let bill = generate_order_bill(&ctx, &mut rand::thread_rng(), Utc::now())?;
        let body = serde_json::to_string(&bill)?;

        if let Err(err) = state.cache.put(ORDERS_CACHE_KEY, &body, state.orders_ttl) {
            warn!(error = %err, "failed to cache orders");
        }

        Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body))
    }
}

// "/{entity}/timeseries"
pub mod timeseries_route {
    use actix_web::web::{Data, Json, Path, Query};
    use actix_web::{get, post, HttpResponse};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Serialize};

    use crate::services::db_models::SeriesPoint;
    use crate::services::db_utils::AppState;
    use crate::services::messages::{FetchSeries, RecordPoint};
    use crate::types::{utc_timestamp, ApiError, EntityKind};

    fn reference_kind(segment: &str) -> Result<EntityKind, ApiError> {
        EntityKind::from_route(segment)
            .filter(|kind| kind.has_time_series())
            .ok_or_else(|| ApiError::UnknownEntity(format!("{segment}/timeseries")))
    }

    #[derive(Deserialize)]
    pub struct PointBody {
        pub id: i32,
        #[serde(rename = "type")]
        pub series: String,
        pub value: f64,
        #[serde(deserialize_with = "utc_timestamp::deserialize")]
        pub date: NaiveDateTime,
    }

    #[derive(Serialize)]
    pub struct PointAck {
        pub target: &'static str,
        pub id: i32,
        pub message: String,
    }

    #[post("/{entity}/timeseries")]
    pub async fn record_point(
        state: Data<AppState>,
        path: Path<String>,
        body: Json<PointBody>,
    ) -> Result<HttpResponse, ApiError> {
        let reference = reference_kind(&path)?;
        let body = body.into_inner();

        state
            .db
            .send(RecordPoint {
                reference,
                reference_id: body.id,
                series: body.series.clone(),
                date: body.date,
                value: body.value,
            })
            .await??;

        Ok(HttpResponse::Ok().json(PointAck {
            target: reference.table_name(),
            id: body.id,
            message: format!("'{}' recorded at {}", body.series, body.date),
        }))
    }

    #[derive(Deserialize)]
    pub struct SeriesQuery {
        pub id: i32,
        #[serde(rename = "type")]
        pub series: String,
    }

    #[derive(Serialize)]
    pub struct SeriesData {
        pub data: Vec<SeriesPoint>,
    }

    #[get("/{entity}/timeseries")]
    pub async fn fetch_series(
        state: Data<AppState>,
        path: Path<String>,
        query: Query<SeriesQuery>,
    ) -> Result<HttpResponse, ApiError> {
        let reference = reference_kind(&path)?;
        let query = query.into_inner();

        let data = state
            .db
            .send(FetchSeries {
                reference,
                reference_id: query.id,
                series: query.series,
            })
            .await??;

        Ok(HttpResponse::Ok().json(SeriesData { data }))
    }
}

// "/{entity}/resource"
pub mod resource_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{post, HttpResponse};
    use serde::Deserialize;
    use serde_json::json;

    use crate::services::db_utils::AppState;
    use crate::services::messages::LookupId;
    use crate::types::{ApiError, EntityKind};

    #[derive(Deserialize)]
    pub struct LookupBody {
        pub name: String,
    }

    #[post("/{entity}/resource")]
    pub async fn lookup_id(
        state: Data<AppState>,
        path: Path<String>,
        body: Json<LookupBody>,
    ) -> Result<HttpResponse, ApiError> {
        let entity = EntityKind::from_route(&path)
            .ok_or_else(|| ApiError::UnknownEntity(format!("{path}/resource")))?;

        match state
            .db
            .send(LookupId { entity, name: body.into_inner().name })
            .await??
        {
            Some(id) => Ok(HttpResponse::Ok().json(json!({ "id": id }))),
            None => Err(ApiError::UnknownReference(entity)),
        }
    }
}

// sub-route "/factory"
pub mod factory_route {
    use std::collections::BTreeMap;

    use actix_web::web::{Data, Json, Query};
    use actix_web::{get, post, HttpResponse};
    use chrono::{NaiveDate, Utc};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::services::db_models::FactoryOrder;
    use crate::services::db_utils::AppState;
    use crate::services::messages::{BookFactoryOrder, Booking, FetchFactoryOrders};
    use crate::types::ApiError;

    #[derive(Deserialize)]
    pub struct DateQuery {
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, PartialEq)]
    pub struct BasketLine {
        pub item: String,
        pub qty: i32,
    }

    #[derive(Debug, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct BakeryOrders {
        pub location_name: String,
        pub order_basket: Vec<BasketLine>,
    }

    #[derive(Serialize)]
    pub struct DayOrders {
        pub date: NaiveDate,
        pub orders: Vec<BakeryOrders>,
    }

    pub fn group_by_bakery(rows: Vec<FactoryOrder>) -> Vec<BakeryOrders> {
        let mut grouped: BTreeMap<String, Vec<BasketLine>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.bakery_name).or_default().push(BasketLine {
                item: row.item_name,
                qty: row.quantity,
            });
        }

        grouped
            .into_iter()
            .map(|(location_name, order_basket)| BakeryOrders { location_name, order_basket })
            .collect()
    }

    #[get("/next-day-order")]
    pub async fn fetch_next_day_orders(
        state: Data<AppState>,
        query: Query<DateQuery>,
    ) -> Result<HttpResponse, ApiError> {
        let date = query.date;
        let rows = state.db.send(FetchFactoryOrders(date)).await??;

        Ok(HttpResponse::Ok().json(DayOrders { date, orders: group_by_bakery(rows) }))
    }

    #[derive(Deserialize)]
    pub struct BookingBody {
        pub bakery: String,
        pub product: String,
        pub quantity: i32,
        pub date: NaiveDate,
    }

    #[post("/next-day-order")]
    pub async fn book_next_day_order(
        state: Data<AppState>,
        body: Json<BookingBody>,
    ) -> Result<HttpResponse, ApiError> {
        let body = body.into_inner();

        if body.date < Utc::now().date_naive() {
            return Err(ApiError::Validation(format!("{} is in the past", body.date)));
        }
        if body.quantity < 1 {
            return Err(ApiError::Validation("quantity must be at least 1".into()));
        }

        let booking = state
            .db
            .send(BookFactoryOrder {
                bakery: body.bakery,
                item: body.product,
                quantity: body.quantity,
                date: body.date,
            })
            .await??;

        match booking {
            // Duplicates answer exactly like fresh bookings.
            Booking::Booked | Booking::Duplicate => Ok(HttpResponse::Ok().json(json!({
                "message": format!("order received for {}", body.date)
            }))),
            Booking::UnknownReference => {
                Err(ApiError::Validation("unknown bakery or product".into()))
            }
        }
    }

}

// sub-route "/test"
pub mod test_route {
    use actix_web::web::Data;
    use actix_web::{get, post, HttpResponse, Responder};

    use crate::services::db_utils::AppState;
    use crate::services::messages::SeedDemoChain;

    #[get("/healthcheck")]
    pub async fn healthcheck() -> impl Responder {
        HttpResponse::Ok().body("I'm alive!")
    }

    #[post("/create-mock-bakery")]
    pub async fn create_mock_bakery(state: Data<AppState>) -> impl Responder {
        match state.db.send(SeedDemoChain).await {
            Ok(Ok(())) => HttpResponse::Ok().json("Demo bakery chain is in place"),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Unable to seed the demo chain: {err}")),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }
}
