use std::env;
use std::ffi::OsString;
use std::time::Duration;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tracing::info;

/// Runtime settings, read once at startup from `BAKERY_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_workers: usize,
    pub redis_url: Option<String>,
    pub orders_cache_ttl_secs: u64,
    pub troll_delay_secs: u64,
    #[serde(default)]
    pub troll: bool,
}

/// Presence is what counts, `TROLL=0` and `TROLL=` still enable it.
fn troll_enabled(var: Option<OsString>) -> bool {
    var.is_some()
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults(Config::builder())?
            .add_source(Environment::with_prefix("BAKERY").try_parsing(true));

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.troll = troll_enabled(env::var_os("TROLL"));

        let cache = if settings.redis_url.is_some() { "redis" } else { "memory" };
        info!(
            database = %settings.database_url,
            troll = settings.troll,
            cache,
            "settings loaded"
        );

        Ok(settings)
    }

    fn defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("database_url", "bakery.db")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("db_workers", 5)?
            .set_default("orders_cache_ttl_secs", 60)?
            .set_default("troll_delay_secs", 5)
    }

    pub fn orders_ttl(&self) -> Duration {
        Duration::from_secs(self.orders_cache_ttl_secs)
    }

    pub fn troll_delay(&self) -> Duration {
        Duration::from_secs(self.troll_delay_secs)
    }
}
