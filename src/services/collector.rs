//! ============================================================
//!  Flat-plate collector model (Hottel-Whillier-Bliss)
//!
//!  Per step:
//!   1. Pump hydraulics   – mass flow from shaft power and head
//!   2. Flow factors      – F″ from the capacitance rate, F_R = F′·F″
//!   3. Energy balance    – q_u = F_R [S·τα − U_L (T_plate − T_amb)]
//!   4. Temperatures      – mean fluid and plate temperature
//! ============================================================

use crate::error::{require_positive, SimulationError};
use crate::models::simulation::{CollectorGain, CollectorTemperatures, SimulationParameters};
use crate::services::irradiance::irradiance;

// ─── Physical constants ──────────────────────────────────────
pub const GRAVITY: f64 = 9.81; // m/s²
const SECONDS_PER_HOUR: f64 = 3600.0;
const JOULES_PER_MJ: f64 = 1.0e6;

/// Mass flow delivered by the circulation pump (kg/s).
///
/// `Q = P·η / (H·g·ρ)` gives the volumetric flow; multiplied back by ρ.
/// Both the collector and the tank stage call this, so the two always see
/// the same flow for the same pump settings.
pub fn mass_flow_rate(
    pump_power: f64,
    pump_efficiency: f64,
    hydraulic_head: f64,
    density: f64,
) -> Result<f64, SimulationError> {
    let head = require_positive("hydraulic_head", hydraulic_head)?;
    let density = require_positive("fluid_density", density)?;

    let volumetric_flow = pump_power * pump_efficiency / (head * GRAVITY * density); // m³/s
    Ok(volumetric_flow * density)
}

/// Useful energy gain of the collector for one step.
///
/// * `hour` – hour of day used for the irradiance lookup
/// * `ambient_temp`, `plate_temp` – °C
/// * `mass_flow_override` – bypasses the pump hydraulics (kg/s)
///
/// With no flow the heat removal factor is zero and so is the gain. A
/// negative gain (plate losing heat) is returned as is.
pub fn collector_gain(
    hour: f64,
    params: &SimulationParameters,
    ambient_temp: f64,
    plate_temp: f64,
    mass_flow_override: Option<f64>,
) -> Result<CollectorGain, SimulationError> {
    let mass_flow = match mass_flow_override {
        Some(m) => m,
        None => mass_flow_rate(
            params.pump_power,
            params.pump_efficiency,
            params.hydraulic_head,
            params.fluid_density,
        )?,
    };

    if mass_flow <= 0.0 || mass_flow.is_nan() {
        return Ok(CollectorGain {
            useful_gain_per_area: 0.0,
            heat_removal_factor: 0.0,
            flow_factor: 0.0,
        });
    }

    let area = require_positive("panel_area", params.panel_area)?;
    let u_l = require_positive("heat_loss_coefficient", params.heat_loss_coefficient)?;
    let f_prime = require_positive("panel_efficiency", params.panel_efficiency)?;

    // ṁ·c_p / (A·U_L·F′)
    let capacitance_rate = mass_flow * params.fluid_specific_heat / (area * u_l * f_prime);
    let flow_factor = capacitance_rate * (1.0 - (-1.0 / capacitance_rate).exp());
    let heat_removal_factor = flow_factor * f_prime;

    let absorbed = irradiance(hour, params.cloud_cover) * params.transmittance * params.absorptance;
    let loss = u_l * (plate_temp - ambient_temp) * SECONDS_PER_HOUR / JOULES_PER_MJ; // MJ/(m²·h)

    let total_gain = heat_removal_factor * area * (absorbed - loss); // MJ/h

    Ok(CollectorGain {
        useful_gain_per_area: total_gain / area,
        heat_removal_factor,
        flow_factor,
    })
}

/// Mean fluid and plate temperature after the collector stage.
///
/// A stagnant collector (`F_R == 0`) keeps the fluid where it is and lifts
/// the plate by `q_u / U_L`. Otherwise the flowing-collector relations
/// (Duffie & Beckman §6.9) apply.
pub fn update_fluid(
    gain: &CollectorGain,
    current_fluid_temp: f64,
    heat_loss_coefficient: f64,
) -> Result<CollectorTemperatures, SimulationError> {
    let u_l = require_positive("heat_loss_coefficient", heat_loss_coefficient)?;

    if gain.heat_removal_factor == 0.0 {
        return Ok(CollectorTemperatures {
            fluid_temp: current_fluid_temp,
            plate_temp: current_fluid_temp + gain.useful_gain_per_area / u_l,
        });
    }

    let power_w_m2 = gain.useful_gain_per_area * JOULES_PER_MJ / SECONDS_PER_HOUR;
    let rise = power_w_m2 / (gain.heat_removal_factor * u_l);

    Ok(CollectorTemperatures {
        fluid_temp: current_fluid_temp + rise * (1.0 - gain.flow_factor),
        plate_temp: current_fluid_temp + rise * (1.0 - gain.heat_removal_factor),
    })
}
