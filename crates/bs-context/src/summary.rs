//! Simulation summary line.

use serde::{Deserialize, Serialize};

/// Headline figures of one simulation run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub delta_minutes: f64,
    pub stress_percentage: f64,

    pub real_pickup_kms: f64,
    pub real_dropoff_kms: f64,
    pub fictional_pickup_kms: f64,
    pub fictional_dropoff_kms: f64,

    pub resolved_real_pickups: f64,
    pub resolved_real_dropoffs: f64,
    pub unresolved_real_pickups: f64,
    pub unresolved_real_dropoffs: f64,

    pub resolved_fictional_pickups: f64,
    pub resolved_fictional_dropoffs: f64,
    pub unresolved_fictional_pickups: f64,
    pub unresolved_fictional_dropoffs: f64,
}

impl SimulationSummary {
    pub const FIELD_COUNT: usize = 14;

    /// Parse the backend's comma separated summary, optionally wrapped in
    /// quotes. Missing or unparsable fields read as zero.
    pub fn parse_csv_line(line: &str) -> Self {
        let cleaned = line.trim();
        let cleaned = cleaned.strip_prefix('"').unwrap_or(cleaned);
        let cleaned = cleaned.strip_suffix('"').unwrap_or(cleaned);

        let mut v = [0.0_f64; Self::FIELD_COUNT];
        for (slot, raw) in v.iter_mut().zip(cleaned.split(',')) {
            *slot = raw.trim().parse::<f64>().ok().filter(|x| x.is_finite()).unwrap_or(0.0);
        }

        Self {
            delta_minutes: v[0],
            stress_percentage: v[1],
            real_pickup_kms: v[2],
            real_dropoff_kms: v[3],
            fictional_pickup_kms: v[4],
            fictional_dropoff_kms: v[5],
            resolved_real_pickups: v[6],
            resolved_real_dropoffs: v[7],
            unresolved_real_pickups: v[8],
            unresolved_real_dropoffs: v[9],
            resolved_fictional_pickups: v[10],
            resolved_fictional_dropoffs: v[11],
            unresolved_fictional_pickups: v[12],
            unresolved_fictional_dropoffs: v[13],
        }
    }

    /// Slot length the run was simulated with, when the summary reports one.
    pub fn input_delta(&self) -> Option<u32> {
        let d = self.delta_minutes;
        (d >= 1.0 && d.fract() == 0.0 && d <= f64::from(u32::MAX)).then_some(d as u32)
    }
}
