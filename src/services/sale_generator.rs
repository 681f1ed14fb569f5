//! Synthetic point-of-sale data.
//!
//! A sale picks one cashier uniformly, then a basket of `1..=catalog size`
//! items drawn with replacement, each with a quantity in `1..=5`. Orders are
//! sales without the cashier, stamped with a delivery date instead.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::services::db_models::SaleContext;
use crate::types::{rfc822, ApiError};

const MAX_QUANTITY: i32 = 5;
const MAX_ORDERS_PER_BILL: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasketItem {
    pub item: String,
    pub price: f64,
    pub qty: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub location_name: String,
    pub location_city: String,
    pub location_region: String,
    #[serde(with = "rfc822")]
    pub purchase_date: DateTime<Utc>,
    pub purchase_basket: Vec<BasketItem>,
    pub cashier_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub location_name: String,
    pub location_city: String,
    pub location_region: String,
    #[serde(with = "rfc822")]
    pub delivery_date: DateTime<Utc>,
    pub purchase_basket: Vec<BasketItem>,
}

impl From<Sale> for Order {
    fn from(sale: Sale) -> Self {
        Order {
            location_name: sale.location_name,
            location_city: sale.location_city,
            location_region: sale.location_region,
            delivery_date: sale.purchase_date,
            purchase_basket: sale.purchase_basket,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBill {
    #[serde(with = "rfc822")]
    pub order_date: DateTime<Utc>,
    pub orders: Vec<Order>,
}

pub fn generate_sale<R: Rng + ?Sized>(
    ctx: &SaleContext,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Sale, ApiError> {
    let post = ctx.cashiers.choose(rng).ok_or(ApiError::NoCashiers)?;
    if ctx.items.is_empty() {
        return Err(ApiError::EmptyCatalog);
    }

    let basket_size = rng.gen_range(1..=ctx.items.len());
    let mut purchase_basket = Vec::with_capacity(basket_size);
    for _ in 0..basket_size {
        let item = &ctx.items[rng.gen_range(0..ctx.items.len())];
        purchase_basket.push(BasketItem {
            item: item.name.clone(),
            price: item.price,
            qty: rng.gen_range(1..=MAX_QUANTITY),
        });
    }

    Ok(Sale {
        location_name: post.bakery.clone(),
        location_city: post.city.clone(),
        location_region: post.region.clone(),
        purchase_date: now,
        purchase_basket,
        cashier_name: post.cashier.clone(),
    })
}

pub fn generate_order_bill<R: Rng + ?Sized>(
    ctx: &SaleContext,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<OrderBill, ApiError> {
    let count = rng.gen_range(1..=MAX_ORDERS_PER_BILL);
    let orders = (0..count)
        .map(|_| generate_sale(ctx, rng, now).map(Order::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OrderBill { order_date: now, orders })
}
