//! Display formatting for remaining time

/// `MM:SS`, rounding partial seconds up so the display reaches 00:00 only at zero
pub fn format_ms_as_clock(ms: u64) -> String {
    let total_sec = ms.div_ceil(1000);
    format!("{:02}:{:02}", total_sec / 60, total_sec % 60)
}
