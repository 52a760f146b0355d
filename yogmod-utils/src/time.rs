use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Discord renders `<t:N:R>` as "in 5 minutes" in the reader's locale.
pub fn relative_timestamp(unix_secs: u64) -> String {
    format!("<t:{unix_secs}:R>")
}
