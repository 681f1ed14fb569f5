use actix::Message;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::QueryResult;

use crate::services::db_models::{FactoryOrder, SaleContext, SeriesPoint};
use crate::types::EntityKind;

#[derive(Message)]
#[rtype(result = "QueryResult<SaleContext>")]
pub struct FetchSaleContext;

/// Upserts one point of a reference entity's time series.
#[derive(Message)]
#[rtype(result = "QueryResult<()>")]
pub struct RecordPoint {
    pub reference: EntityKind,
    pub reference_id: i32,
    pub series: String,
    pub date: NaiveDateTime,
    pub value: f64,
}

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<SeriesPoint>>")]
pub struct FetchSeries {
    pub reference: EntityKind,
    pub reference_id: i32,
    pub series: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Booking {
    Booked,
    Duplicate,
    UnknownReference,
}

#[derive(Message)]
#[rtype(result = "QueryResult<Booking>")]
pub struct BookFactoryOrder {
    pub bakery: String,
    pub item: String,
    pub quantity: i32,
    pub date: NaiveDate,
}

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<FactoryOrder>>")]
pub struct FetchFactoryOrders(pub NaiveDate);

#[derive(Message)]
#[rtype(result = "QueryResult<Option<i32>>")]
pub struct LookupId {
    pub entity: EntityKind,
    pub name: String,
}

#[derive(Message)]
#[rtype(result = "QueryResult<()>")]
pub struct SeedDemoChain;
