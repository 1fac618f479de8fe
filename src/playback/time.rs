/// Format a duration in seconds as `M:SS`.
///
/// Minutes are not zero-padded and keep growing past an hour; negative and
/// non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
