/// Formats a second count as `mm:ss` (minutes are not capped at 60).
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
