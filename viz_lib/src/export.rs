//! Naming and background of the exported canvas image.

use chrono::{DateTime, SecondsFormat, Utc};

pub const FILE_PREFIX: &str = "wsn-simulation";
/// Exported images are flattened onto this colour.
pub const BACKGROUND: &str = "#fff";

/// `wsn-simulation-2026-10-17T06-53-00-000Z.png` for the given instant.
pub fn png_file_name(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{FILE_PREFIX}-{stamp}.png")
}

/// Same as [`png_file_name`] from milliseconds since the Unix epoch, as the
/// browser clock reports them. Out-of-range values fall back to the epoch.
pub fn png_file_name_at_millis(millis: f64) -> String {
    let at = DateTime::from_timestamp_millis(millis as i64).unwrap_or_default();
    png_file_name(at)
}
