use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, Utc};
use msisdn_core::domain::SubscriberId;
use std::str::FromStr;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
        .with_timezone(&Local);
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn parse_subscriber_id(raw: &str) -> Result<SubscriberId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("subscriber id cannot be empty"));
    }
    SubscriberId::from_str(trimmed).map_err(|_| anyhow!("invalid subscriber id"))
}
