/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Split a free-text size descriptor ("S, M,L") into trimmed, non-empty entries
pub fn split_sizes(descriptor: &str) -> Vec<String> {
    descriptor
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
