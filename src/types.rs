use std::fmt::{Debug, Display, Formatter};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

pub const ORDERS_CACHE_KEY: &str = "bakery_orders";

#[derive(Debug)]
pub struct PoolInitializationError(pub String);

impl Display for PoolInitializationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl std::error::Error for PoolInitializationError {}

/// Entities addressable by name through `/{entity}/resource`.
/// All of them except [`EntityKind::Item`] can own time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Country,
    Region,
    City,
    Bakery,
    Cashier,
    Item,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Country,
        EntityKind::Region,
        EntityKind::City,
        EntityKind::Bakery,
        EntityKind::Cashier,
        EntityKind::Item,
    ];

    /// Resolves the pluralized route segment, e.g. `bakeries`.
    pub fn from_route(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.route() == segment)
    }

    pub fn route(self) -> &'static str {
        match self {
            EntityKind::Country => "countries",
            EntityKind::Region => "regions",
            EntityKind::City => "cities",
            EntityKind::Bakery => "bakeries",
            EntityKind::Cashier => "cashiers",
            EntityKind::Item => "items",
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Country => "country",
            EntityKind::Region => "region",
            EntityKind::City => "city",
            EntityKind::Bakery => "bakery",
            EntityKind::Cashier => "cashier",
            EntityKind::Item => "item",
        }
    }

    pub fn has_time_series(self) -> bool {
        !matches!(self, EntityKind::Item)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.table_name())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("no such resource: /{0}")]
    UnknownEntity(String),
    #[error("unknown {0}")]
    UnknownReference(EntityKind),
    #[error("{0}")]
    Validation(String),
    #[error("no cashier is registered yet")]
    NoCashiers,
    #[error("the item catalog is empty")]
    EmptyCatalog,
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("database actor unavailable: {0}")]
    Mailbox(#[from] actix::MailboxError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownEntity(_) => StatusCode::NOT_FOUND,
            ApiError::UnknownReference(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NoCashiers | ApiError::EmptyCatalog => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Mailbox(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(self.to_string())
    }
}

/// RFC 822 timestamps, e.g. `Mon, 19 Oct 2026 10:00:00 +0000`.
pub mod rfc822 {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc2822())
    }
}

/// Accepts RFC 3339 timestamps with an offset, normalized to UTC, as well as
/// naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamps taken to already be UTC.
pub mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(raw)
            .map(|date| date.naive_utc())
            .or_else(|_| raw.parse::<NaiveDateTime>())
            .ok()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_segments_resolve_to_tables() {
        assert_eq!(EntityKind::from_route("bakeries"), Some(EntityKind::Bakery));
        assert_eq!(EntityKind::from_route("cities"), Some(EntityKind::City));
        assert_eq!(EntityKind::from_route("bakery"), None);
        assert_eq!(EntityKind::Cashier.table_name(), "cashier");
        assert!(!EntityKind::Item.has_time_series());
        assert!(EntityKind::Country.has_time_series());
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let eight = chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        assert_eq!(utc_timestamp::parse("2026-10-19T08:00:00"), Some(eight));
        assert_eq!(utc_timestamp::parse("2026-10-19T08:00:00Z"), Some(eight));
        assert_eq!(utc_timestamp::parse("2026-10-19T10:00:00+02:00"), Some(eight));
        assert_eq!(utc_timestamp::parse("yesterday"), None);
    }

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(ApiError::UnknownReference(EntityKind::Bakery).to_string(), "unknown bakery");
        assert_eq!(ApiError::UnknownReference(EntityKind::Bakery).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnknownEntity("unicorns".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EmptyCatalog.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::Database(diesel::result::Error::NotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
