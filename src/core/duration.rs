//! Duration text parsing and formatting.
//!
//! Durations are entered and displayed as `MM:SS`, or `HH:MM:SS` once they
//! reach an hour. Malformed text parses to 0 seconds (a zero-length step) -
//! bad practice data must never take down a live session.

/// Parse `"MM:SS"` or `"HH:MM:SS"` into whole seconds.
///
/// Any other shape (wrong field count, non-integer fields, signs) yields 0.
/// Fields are not range-checked: `"1:90"` is 150 seconds.
pub fn parse_duration(text: &str) -> u32 {
    let fields: Vec<Option<u32>> = text
        .trim()
        .split(':')
        .map(|f| f.parse::<u32>().ok())
        .collect();

    let total: u64 = match fields.as_slice() {
        [Some(m), Some(s)] => *m as u64 * 60 + *s as u64,
        [Some(h), Some(m), Some(s)] => *h as u64 * 3600 + *m as u64 * 60 + *s as u64,
        _ => 0,
    };
    total.min(u32::MAX as u64) as u32
}

/// Format whole seconds as `"MM:SS"`, or `"HH:MM:SS"` for an hour and up.
/// All fields are zero-padded to two digits. Takes `u64` so aggregated
/// totals format without narrowing.
pub fn format_duration(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if secs >= 3600 {
        format!("{:02}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}
