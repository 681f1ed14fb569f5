use actix::Handler;
use diesel::upsert::excluded;
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    result::{DatabaseErrorKind, Error},
    Connection, ExpressionMethods, OptionalExtension, QueryDsl, QueryResult, RunQueryDsl,
    SqliteConnection,
};
use tracing::{debug, warn};

use crate::services::db_models::{CashierPost, FactoryOrder, Item, SaleContext, SeriesPoint};
use crate::services::db_utils::DbActor;
use crate::services::insertable::{
    NewBakery, NewCashier, NewCity, NewCountry, NewFactoryOrder, NewItem, NewPoint, NewRegion,
};
use crate::services::messages::{
    BookFactoryOrder, Booking, FetchFactoryOrders, FetchSaleContext, FetchSeries, LookupId,
    RecordPoint, SeedDemoChain,
};
use crate::types::EntityKind;

fn establish_connection(
    pool: &Pool<ConnectionManager<SqliteConnection>>,
) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, Error> {
    match pool.get() {
        Ok(val) => Ok(val),
        Err(_) => Err(connection_err()),
    }
}

fn connection_err() -> Error {
    Error::DatabaseError(
        DatabaseErrorKind::ClosedConnection,
        Box::new("Failed to establish connection".to_owned()),
    )
}

impl Handler<FetchSaleContext> for DbActor {
    type Result = QueryResult<SaleContext>;

    fn handle(&mut self, _msg: FetchSaleContext, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::{bakery, cashier, city, item, region};

        let mut conn = establish_connection(&self.0)?;

        let cashiers = cashier::table
            .inner_join(bakery::table.inner_join(city::table.inner_join(region::table)))
            .select((cashier::name, bakery::name, city::name, region::name))
            .load::<CashierPost>(&mut conn)?;

        let items = item::table
            .select((item::name, item::price))
            .load::<Item>(&mut conn)?;

        Ok(SaleContext { cashiers, items })
    }
}

impl Handler<RecordPoint> for DbActor {
    type Result = QueryResult<()>;

    fn handle(&mut self, msg: RecordPoint, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::time_series::dsl::{date, reference, reference_id, series, time_series, value};

        let mut conn = establish_connection(&self.0)?;

        diesel::insert_into(time_series)
            .values(NewPoint {
                reference: msg.reference.table_name().to_owned(),
                reference_id: msg.reference_id,
                series: msg.series,
                date: msg.date,
                value: msg.value,
            })
            .on_conflict((reference, reference_id, series, date))
            .do_update()
            .set(value.eq(excluded(value)))
            .execute(&mut conn)?;

        Ok(())
    }
}

impl Handler<FetchSeries> for DbActor {
    type Result = QueryResult<Vec<SeriesPoint>>;

    fn handle(&mut self, msg: FetchSeries, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::time_series::dsl::{date, reference, reference_id, series, time_series, value};

        let mut conn = establish_connection(&self.0)?;

        time_series
            .filter(reference.eq(msg.reference.table_name()))
            .filter(reference_id.eq(msg.reference_id))
            .filter(series.eq(msg.series))
            .select((date, value))
            .order(date.asc())
            .load::<SeriesPoint>(&mut conn)
    }
}

impl Handler<BookFactoryOrder> for DbActor {
    type Result = QueryResult<Booking>;

    fn handle(&mut self, msg: BookFactoryOrder, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::factory_order::dsl::factory_order;

        let mut conn = establish_connection(&self.0)?;

        let inserted = diesel::insert_into(factory_order)
            .values(NewFactoryOrder {
                bakery_name: msg.bakery.clone(),
                item_name: msg.item.clone(),
                date: msg.date,
                quantity: msg.quantity,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn);

        match inserted {
            Ok(0) => {
                warn!(bakery = %msg.bakery, item = %msg.item, date = %msg.date, "duplicate factory order dropped");
                Ok(Booking::Duplicate)
            }
            Ok(_) => {
                debug!(bakery = %msg.bakery, item = %msg.item, date = %msg.date, "factory order booked");
                Ok(Booking::Booked)
            }
            Err(Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                Ok(Booking::UnknownReference)
            }
            Err(err) => Err(err),
        }
    }
}

impl Handler<FetchFactoryOrders> for DbActor {
    type Result = QueryResult<Vec<FactoryOrder>>;

    fn handle(&mut self, msg: FetchFactoryOrders, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::factory_order::dsl::{bakery_name, date, factory_order, item_name, quantity};

        let mut conn = establish_connection(&self.0)?;

        factory_order
            .filter(date.eq(msg.0))
            .order((bakery_name.asc(), item_name.asc()))
            .select((bakery_name, item_name, quantity))
            .load::<FactoryOrder>(&mut conn)
    }
}

impl Handler<LookupId> for DbActor {
    type Result = QueryResult<Option<i32>>;

    fn handle(&mut self, msg: LookupId, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::{bakery, cashier, city, country, item, region};

        let mut conn = establish_connection(&self.0)?;
        let name = msg.name.as_str();

        match msg.entity {
            EntityKind::Country => country::table
                .filter(country::name.eq(name))
                .select(country::id)
                .first::<i32>(&mut conn)
                .optional(),
            EntityKind::Region => region::table
                .filter(region::name.eq(name))
                .select(region::id)
                .first::<i32>(&mut conn)
                .optional(),
            EntityKind::City => city::table
                .filter(city::name.eq(name))
                .select(city::id)
                .first::<i32>(&mut conn)
                .optional(),
            EntityKind::Bakery => bakery::table
                .filter(bakery::name.eq(name))
                .select(bakery::id)
                .first::<i32>(&mut conn)
                .optional(),
            EntityKind::Cashier => cashier::table
                .filter(cashier::name.eq(name))
                .select(cashier::id)
                .first::<i32>(&mut conn)
                .optional(),
            EntityKind::Item => item::table
                .filter(item::name.eq(name))
                .select(item::id)
                .first::<i32>(&mut conn)
                .optional(),
        }
    }
}

impl Handler<SeedDemoChain> for DbActor {
    type Result = QueryResult<()>;

    fn handle(&mut self, _msg: SeedDemoChain, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::{bakery, cashier, city, country, item, region};

        let mut conn = establish_connection(&self.0)?;

        conn.transaction(|trx_conn| {
            diesel::insert_into(country::table)
                .values(NewCountry { name: "France" })
                .on_conflict_do_nothing()
                .execute(trx_conn)?;
            let country_id = country::table
                .filter(country::name.eq("France"))
                .select(country::id)
                .first::<i32>(trx_conn)?;

            diesel::insert_into(region::table)
                .values(NewRegion { name: "Île-de-France", country_id })
                .on_conflict_do_nothing()
                .execute(trx_conn)?;
            let region_id = region::table
                .filter(region::name.eq("Île-de-France"))
                .select(region::id)
                .first::<i32>(trx_conn)?;

            diesel::insert_into(city::table)
                .values(NewCity { name: "Paris", region_id })
                .on_conflict_do_nothing()
                .execute(trx_conn)?;
            let city_id = city::table
                .filter(city::name.eq("Paris"))
                .select(city::id)
                .first::<i32>(trx_conn)?;

            diesel::insert_into(bakery::table)
                .values(NewBakery { name: "Le Pain", city_id })
                .on_conflict_do_nothing()
                .execute(trx_conn)?;
            let bakery_id = bakery::table
                .filter(bakery::name.eq("Le Pain"))
                .select(bakery::id)
                .first::<i32>(trx_conn)?;

            diesel::insert_into(cashier::table)
                .values(NewCashier { name: "Alice", bakery_id })
                .on_conflict_do_nothing()
                .execute(trx_conn)?;

            for (name, price) in [("Croissant", 1.20), ("Baguette", 1.00)] {
                diesel::insert_into(item::table)
                    .values(NewItem { name, price })
                    .on_conflict_do_nothing()
                    .execute(trx_conn)?;
            }

            Ok(())
        })
    }
}
