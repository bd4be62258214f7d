use std::time::Duration;

/// Shown when there is no meaningful time to render.
pub const TIME_PLACEHOLDER: &str = "0:00";

/// Format `seconds` as `m:ss`.
///
/// Non-finite input renders the placeholder; negative input clamps to zero.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return TIME_PLACEHOLDER.to_string();
    }
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format an optional duration, using the placeholder when it is unknown.
pub fn format_duration(d: Option<Duration>) -> String {
    match d {
        Some(d) => format_time(d.as_secs_f64()),
        None => TIME_PLACEHOLDER.to_string(),
    }
}
