use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Stores rendered response bodies for a bounded amount of time.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    fn put(&self, key: &str, body: &str, ttl: Duration) -> Result<(), String>;
}

pub struct RedisCache(pub redis::Client);

impl ResponseCache for RedisCache {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let mut conn = match self.0.get_connection() {
            Ok(conn) => conn,
            Err(_) => return Err("Failed to establish connection with redis".into()),
        };

        redis::cmd("GET")
            .arg(key)
            .query::<Option<String>>(&mut conn)
            .map_err(|err| format!("Failed to read '{key}' from redis: {err}"))
    }

    fn put(&self, key: &str, body: &str, ttl: Duration) -> Result<(), String> {
        let mut conn = match self.0.get_connection() {
            Ok(conn) => conn,
            Err(_) => return Err("Failed to establish connection with redis".into()),
        };

        redis::cmd("SET")
            .arg(key)
            .arg(body)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query::<()>(&mut conn)
            .map_err(|err| format!("Failed to write '{key}' to redis: {err}"))
    }
}

/// Process-local fallback used when no redis is configured.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match entries.get(key) {
            Some((expires_at, body)) if *expires_at > Instant::now() => Ok(Some(body.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, body: &str, ttl: Duration) -> Result<(), String> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        entries.insert(key.to_owned(), (Instant::now() + ttl, body.to_owned()));
        Ok(())
    }
}
