pub fn is_truthy(value: impl AsRef<str>) -> bool {
    matches!(
        value.as_ref().trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn env_flag(key: &str) -> bool {
    std::env::var(key).ok().map(is_truthy).unwrap_or(false)
}

/// Reads a non-negative integer setting; unset or unparsable values fall back.
pub fn env_u64(key: &str, fallback: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(fallback)
}
