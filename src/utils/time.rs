use chrono::{Duration, Utc};
use surrealdb::sql::Datetime;

use crate::consts::invite_const::INVITE_TTL_DAYS;

pub fn now() -> Datetime {
    Datetime::from(Utc::now())
}

pub fn invite_expiry() -> Datetime {
    Datetime::from(Utc::now() + Duration::days(INVITE_TTL_DAYS))
}

#[cfg(test)]
pub fn days_ago(days: i64) -> Datetime {
    Datetime::from(Utc::now() - Duration::days(days))
}
