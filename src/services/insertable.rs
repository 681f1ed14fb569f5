use chrono::{NaiveDate, NaiveDateTime};
use diesel::Insertable;

use crate::schema::bakery;
use crate::schema::cashier;
use crate::schema::city;
use crate::schema::country;
use crate::schema::factory_order;
use crate::schema::item;
use crate::schema::region;
use crate::schema::time_series;

#[derive(Insertable, Clone)]
#[diesel(table_name = time_series)]
pub struct NewPoint {
    pub reference: String,
    pub reference_id: i32,
    pub series: String,
    pub date: NaiveDateTime,
    pub value: f64,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = factory_order)]
pub struct NewFactoryOrder {
    pub bakery_name: String,
    pub item_name: String,
    pub date: NaiveDate,
    pub quantity: i32,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = country)]
pub struct NewCountry<'a> {
    pub name: &'a str,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = region)]
pub struct NewRegion<'a> {
    pub name: &'a str,
    pub country_id: i32,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = city)]
pub struct NewCity<'a> {
    pub name: &'a str,
    pub region_id: i32,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = bakery)]
pub struct NewBakery<'a> {
    pub name: &'a str,
    pub city_id: i32,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = cashier)]
pub struct NewCashier<'a> {
    pub name: &'a str,
    pub bakery_id: i32,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = item)]
pub struct NewItem<'a> {
    pub name: &'a str,
    pub price: f64,
}
