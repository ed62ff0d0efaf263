use chrono::{DateTime, Local, Utc};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local);
    dt.format("%Y-%m-%d %H:%M").to_string()
}
