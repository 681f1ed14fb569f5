use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::Serialize;

#[derive(Queryable, Debug, Clone)]
pub struct Item {
    pub name: String,
    pub price: f64,
}

/// A cashier together with the bakery, city and region it works for.
#[derive(Queryable, Debug, Clone)]
pub struct CashierPost {
    pub cashier: String,
    pub bakery: String,
    pub city: String,
    pub region: String,
}

#[derive(Queryable, Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDateTime,
    pub value: f64,
}

#[derive(Queryable, Debug, Clone)]
pub struct FactoryOrder {
    pub bakery_name: String,
    pub item_name: String,
    pub quantity: i32,
}

/// Everything the sale generator draws from.
#[derive(Debug, Clone, Default)]
pub struct SaleContext {
    pub cashiers: Vec<CashierPost>,
    pub items: Vec<Item>,
}
