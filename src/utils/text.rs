/// Shortens `value` to at most `max_bytes` for log output without splitting a
/// UTF-8 sequence. Clipped text ends with an ellipsis.
pub fn clip_for_log(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &value[..end])
}
