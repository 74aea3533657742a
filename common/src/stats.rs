use crate::snapshot::null_as_default;
use serde::{Deserialize, Serialize};

/// Aggregate connectivity statistics computed by the backend for the
/// current snapshot.
#[derive(Serialize, Default, Clone, Debug, Deserialize, PartialEq)]
pub struct SimStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_degree: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_degree: u64,
    /// `(degree or bin start, count)` pairs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree_hist: Vec<(u64, u64)>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msgs_started: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub msgs_completed: u64,
    /// Completed messages per unit of simulated time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub packet_rate: f64,
}

impl SimStats {
    /// Largest histogram count, used to scale histogram bars.
    pub fn histogram_peak(&self) -> u64 {
        self.degree_hist
            .iter()
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0)
    }
}
