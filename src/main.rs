use std::sync::Arc;

use actix::{Addr, SyncArbiter};
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use services::cache_handling::{MemoryCache, RedisCache, ResponseCache};
use services::db_utils::{create_tables, get_db_pool, AppState, DbActor};
use services::troll::Troll;
use settings::Settings;

mod schema;
mod services;
mod settings;
mod types;
#[cfg(test)]
mod test;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn init_db(settings: &Settings) -> std::io::Result<Addr<DbActor>> {
    let pool = get_db_pool(&settings.database_url).map_err(std::io::Error::other)?;
    create_tables(&pool).map_err(std::io::Error::other)?;
    info!(database = %settings.database_url, workers = settings.db_workers, "database ready");

    Ok(SyncArbiter::start(settings.db_workers, move || DbActor(pool.clone())))
}

fn init_cache(settings: &Settings) -> std::io::Result<Arc<dyn ResponseCache>> {
    match &settings.redis_url {
        Some(uri) => {
            let client = redis::Client::open(uri.as_str()).map_err(std::io::Error::other)?;
            Ok(Arc::new(RedisCache(client)))
        }
        None => Ok(Arc::new(MemoryCache::default())),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    init_tracing();

    let settings = Settings::load().map_err(std::io::Error::other)?;
    let db = init_db(&settings)?;
    let state = Data::new(AppState {
        db,
        cache: init_cache(&settings)?,
        orders_ttl: settings.orders_ttl(),
    });

    let troll = Troll::new(settings.troll, settings.troll_delay());
    info!(host = %settings.host, port = settings.port, "starting bakery backend");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(troll.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(services::configure)
    })
        .bind((settings.host.as_str(), settings.port))?
        .run()
        .await
}
