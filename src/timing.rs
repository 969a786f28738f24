//! Frame and game-time conversions.
//!
//! The engine simulates 24 frames per game second on the "Fastest" speed
//! that every ladder replay is recorded at. This rate is fixed by the engine.

/// Simulated frames per game second.
pub const FRAMES_PER_SECOND: u32 = 24;

/// Simulated frames per game minute.
pub const FRAMES_PER_MINUTE: u32 = FRAMES_PER_SECOND * 60;

/// Formats a frame number as `mm:ss` game time.
///
/// Minutes are not wrapped into hours, so long games read `75:03`.
///
/// # Example
///
/// ```
/// use bwrep_parser::timing::frame_timestamp;
///
/// assert_eq!(frame_timestamp(0), "00:00");
/// assert_eq!(frame_timestamp(1440), "01:00");
/// assert_eq!(frame_timestamp(1487), "01:01");
/// ```
#[must_use]
pub fn frame_timestamp(frame: u32) -> String {
    let total_seconds = frame / FRAMES_PER_SECOND;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Formats a frame count as a duration, `mm:ss` or `h:mm:ss` past an hour.
#[must_use]
pub fn duration_string(frames: u32) -> String {
    let total_seconds = frames / FRAMES_PER_SECOND;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Converts a frame count to fractional game minutes.
#[must_use]
pub fn game_minutes(frames: u32) -> f64 {
    f64::from(frames) / f64::from(FRAMES_PER_MINUTE)
}
