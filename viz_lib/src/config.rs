//! Viewer configuration.
//!
//! Defaults match the stock backend; a deployment can override a few of
//! them from the page query string, e.g. `?api=/sim/api&poll_ms=250`.

use crate::error::{VizError, VizResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often the poller fetches a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollCadence {
    /// Once per display refresh.
    EveryFrame,
    /// Fixed delay between the end of one cycle and the start of the next.
    Interval(Duration),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizConfig {
    /// Path prefix of the backend API, without trailing slash.
    pub api_base: String,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Zoom factor applied per wheel notch.
    pub wheel_zoom_step: f64,
    /// Zoom factor applied by the zoom in/out buttons.
    pub button_zoom_step: f64,
    pub default_node_size: f64,
    pub min_node_size: f64,
    pub max_node_size: f64,
    /// Local storage key of the persisted preferences.
    pub storage_key: String,
    pub cadence: PollCadence,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            min_scale: 0.02,
            max_scale: 10.0,
            wheel_zoom_step: 1.1,
            button_zoom_step: 1.2,
            default_node_size: 6.0,
            min_node_size: 2.0,
            max_node_size: 24.0,
            storage_key: "wsn_ui".to_string(),
            cadence: PollCadence::EveryFrame,
        }
    }
}

impl VizConfig {
    /// Full URL path of an API endpoint, e.g. `endpoint("state")`.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.api_base, name.trim_start_matches('/'))
    }

    /// Apply overrides from a URL query string (with or without the leading
    /// `?`). Unknown keys are ignored.
    pub fn with_query(mut self, query: &str) -> VizResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "api" => {
                    let value = value.trim_end_matches('/');
                    if value.is_empty() {
                        return Err(invalid(key, value));
                    }
                    self.api_base = value.to_string();
                }
                "poll_ms" => {
                    let ms: u64 = value.parse().map_err(|_| invalid(key, value))?;
                    self.cadence = if ms == 0 {
                        PollCadence::EveryFrame
                    } else {
                        PollCadence::Interval(Duration::from_millis(ms))
                    };
                }
                "min_scale" => self.min_scale = parse_positive(key, value)?,
                "max_scale" => self.max_scale = parse_positive(key, value)?,
                _ => tracing::debug!(key, "Ignoring unknown query parameter"),
            }
        }
        if self.min_scale > self.max_scale {
            return Err(invalid("min_scale", &self.min_scale.to_string()));
        }
        Ok(self)
    }
}

fn invalid(key: &str, value: &str) -> VizError {
    VizError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_positive(key: &str, value: &str) -> VizResult<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(invalid(key, value)),
    }
}
