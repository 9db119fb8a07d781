use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Simulate request ────────────────────────────────────────────────────────
//
// Field names follow the web frontend. Every temperature on the wire is °F;
// anything left out falls back to the configured defaults.

/// Fixed ambient temperature: a number in °F, or the string `"None"` to use
/// the diurnal model.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FixedTemp {
    Degrees(f64),
    Text(String),
}

/// A number, bare or quoted. Form fields are posted as typed, so `"0.5"`
/// arrives as a string.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    /// Panel area (m²)
    pub area: Option<WireNumber>,
    /// Plate efficiency factor F′ (0-1)
    pub efficiency: Option<WireNumber>,
    /// Pump power (W)
    pub pump_power: Option<WireNumber>,
    /// Hour of day at step 0
    pub hour: Option<WireNumber>,
    /// Number of hourly steps
    pub duration: Option<u32>,
    /// Step length (s)
    pub time_step: Option<WireNumber>,
    pub min_ambient_temp: Option<WireNumber>,
    pub max_ambient_temp: Option<WireNumber>,
    /// Cloud cover (0-100 %)
    pub cloud_cover: Option<WireNumber>,
    /// J/(kg·K)
    pub specific_heat: Option<WireNumber>,
    /// Initial fluid temperature (°F)
    pub fluid_temp: Option<WireNumber>,
    pub transmittance: Option<WireNumber>,
    pub absorptance: Option<WireNumber>,
    /// m³
    pub tank_volume: Option<WireNumber>,
    /// Initial tank temperature (°F)
    pub tank_temp: Option<WireNumber>,
    pub pump_efficiency: Option<WireNumber>,
    /// m
    pub hydraulic_head: Option<WireNumber>,
    /// W/(m²·K)
    #[serde(rename = "U_L")]
    pub u_l: Option<WireNumber>,
    /// kg/m³
    pub density: Option<WireNumber>,
    pub fixed_temp: Option<FixedTemp>,
    /// Step index → partial parameter change
    #[serde(default)]
    pub input_changes: BTreeMap<u32, InputChange>,
    /// First step to compute
    pub start_hour: Option<u32>,
    /// State at the end of the step before `startHour` (°F)
    pub current_state: Option<CurrentState>,
}

/// Mid-run change. Temperatures °F; `fluidTemp` / `tankTemp` reset state.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputChange {
    pub area: Option<WireNumber>,
    pub efficiency: Option<WireNumber>,
    pub pump_power: Option<WireNumber>,
    pub time_step: Option<WireNumber>,
    pub min_ambient_temp: Option<WireNumber>,
    pub max_ambient_temp: Option<WireNumber>,
    pub cloud_cover: Option<WireNumber>,
    pub specific_heat: Option<WireNumber>,
    pub fluid_temp: Option<WireNumber>,
    pub transmittance: Option<WireNumber>,
    pub absorptance: Option<WireNumber>,
    pub tank_volume: Option<WireNumber>,
    pub tank_temp: Option<WireNumber>,
    pub pump_efficiency: Option<WireNumber>,
    pub hydraulic_head: Option<WireNumber>,
    #[serde(rename = "U_L")]
    pub u_l: Option<WireNumber>,
    pub density: Option<WireNumber>,
    pub fixed_temp: Option<FixedTemp>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentState {
    pub fluid_temp: f64,
    pub panel_temp: f64,
    pub tank_temp: f64,
}

// ─── Simulate response ───────────────────────────────────────────────────────

/// One hour of output, temperatures °F.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemperaturePoint {
    pub time: u32,
    pub fluid_temp: f64,
    pub panel_temp: f64,
    pub tank_temp: f64,
    pub ambient_temp: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub generated_at: DateTime<Utc>,
    pub temperatures: Vec<TemperaturePoint>,
}

// ─── Service status ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub runs_completed: u64,
}
