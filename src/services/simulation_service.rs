//! Translation between the HTTP wire format (°F, optional fields) and the
//! Celsius-only thermal engine.

use chrono::Utc;
use tracing::debug;

use crate::config::SimulationDefaults;
use crate::error::ApiError;
use crate::models::api::{
    CurrentState, FixedTemp, InputChange, SimulateRequest, SimulateResponse, TemperaturePoint,
    WireNumber,
};
use crate::models::simulation::{
    ParameterOverride, Schedule, SimulationParameters, SimulationRun, SimulationState, StepResult,
};
use crate::services::simulation::simulate;
use crate::services::units::{celsius_to_fahrenheit, fahrenheit_to_celsius};

/// Runs a simulate request end to end.
pub fn run(
    request: &SimulateRequest,
    defaults: &SimulationDefaults,
    max_duration_steps: u32,
) -> Result<SimulateResponse, ApiError> {
    let run = build_run(request, defaults)?;
    if run.duration > max_duration_steps {
        return Err(ApiError::BadRequest(format!(
            "duration {} exceeds the limit of {} steps",
            run.duration, max_duration_steps
        )));
    }

    let schedule = build_schedule(request)?;
    let start_step = request.start_hour.unwrap_or(0);

    let results = simulate(&run, &schedule, start_step)?;
    debug!(steps = results.len(), start_step, "simulation finished");

    Ok(SimulateResponse {
        generated_at: Utc::now(),
        temperatures: results.iter().map(to_point).collect(),
    })
}

/// Request → engine input, with defaults applied and temperatures in °C.
pub fn build_run(request: &SimulateRequest, defaults: &SimulationDefaults) -> Result<SimulationRun, ApiError> {
    let value = |field: &'static str, v: &Option<WireNumber>, default: f64| -> Result<f64, ApiError> {
        Ok(parse_number(field, v)?.unwrap_or(default))
    };
    let celsius = |field: &'static str, v: &Option<WireNumber>, default_c: f64| -> Result<f64, ApiError> {
        Ok(parse_number(field, v)?.map(fahrenheit_to_celsius).unwrap_or(default_c))
    };

    let parameters = SimulationParameters {
        panel_area: value("area", &request.area, defaults.area)?,
        panel_efficiency: value("efficiency", &request.efficiency, defaults.efficiency)?,
        cloud_cover: value("cloudCover", &request.cloud_cover, defaults.cloud_cover)?,
        fluid_specific_heat: value("specificHeat", &request.specific_heat, defaults.specific_heat)?,
        fluid_density: value("density", &request.density, defaults.density)?,
        transmittance: value("transmittance", &request.transmittance, defaults.transmittance)?,
        absorptance: value("absorptance", &request.absorptance, defaults.absorptance)?,
        heat_loss_coefficient: value("U_L", &request.u_l, defaults.u_l)?,
        pump_power: value("pumpPower", &request.pump_power, defaults.pump_power)?,
        hydraulic_head: value("hydraulicHead", &request.hydraulic_head, defaults.hydraulic_head)?,
        pump_efficiency: value("pumpEfficiency", &request.pump_efficiency, defaults.pump_efficiency)?,
        tank_volume: value("tankVolume", &request.tank_volume, defaults.tank_volume)?,
        time_step_seconds: value("timeStep", &request.time_step, defaults.time_step)?,
        fixed_ambient_temp: match &request.fixed_temp {
            Some(fixed) => parse_fixed_temp(fixed)?,
            None => None,
        },
        min_ambient_temp: celsius("minAmbientTemp", &request.min_ambient_temp, defaults.min_ambient_temp)?,
        max_ambient_temp: celsius("maxAmbientTemp", &request.max_ambient_temp, defaults.max_ambient_temp)?,
    };

    Ok(SimulationRun {
        initial_hour: value("hour", &request.hour, defaults.hour)?,
        initial_fluid_temp: celsius("fluidTemp", &request.fluid_temp, defaults.fluid_temp)?,
        initial_tank_temp: celsius("tankTemp", &request.tank_temp, defaults.tank_temp)?,
        resume_from: request.current_state.map(state_to_celsius),
        ..SimulationRun::new(parameters, request.duration.unwrap_or(defaults.duration))
    })
}

/// Wire changes → engine schedule (°C).
pub fn build_schedule(request: &SimulateRequest) -> Result<Schedule, ApiError> {
    request
        .input_changes
        .iter()
        .map(|(step, change)| Ok((*step, to_override(change)?)))
        .collect()
}

fn to_override(change: &InputChange) -> Result<ParameterOverride, ApiError> {
    let celsius = |field: &'static str, v: &Option<WireNumber>| -> Result<Option<f64>, ApiError> {
        Ok(parse_number(field, v)?.map(fahrenheit_to_celsius))
    };

    Ok(ParameterOverride {
        panel_area: parse_number("area", &change.area)?,
        panel_efficiency: parse_number("efficiency", &change.efficiency)?,
        cloud_cover: parse_number("cloudCover", &change.cloud_cover)?,
        fluid_specific_heat: parse_number("specificHeat", &change.specific_heat)?,
        fluid_density: parse_number("density", &change.density)?,
        transmittance: parse_number("transmittance", &change.transmittance)?,
        absorptance: parse_number("absorptance", &change.absorptance)?,
        heat_loss_coefficient: parse_number("U_L", &change.u_l)?,
        pump_power: parse_number("pumpPower", &change.pump_power)?,
        hydraulic_head: parse_number("hydraulicHead", &change.hydraulic_head)?,
        pump_efficiency: parse_number("pumpEfficiency", &change.pump_efficiency)?,
        tank_volume: parse_number("tankVolume", &change.tank_volume)?,
        time_step_seconds: parse_number("timeStep", &change.time_step)?,
        fixed_ambient_temp: change.fixed_temp.as_ref().map(parse_fixed_temp).transpose()?,
        min_ambient_temp: celsius("minAmbientTemp", &change.min_ambient_temp)?,
        max_ambient_temp: celsius("maxAmbientTemp", &change.max_ambient_temp)?,
        fluid_temp: celsius("fluidTemp", &change.fluid_temp)?,
        tank_temp: celsius("tankTemp", &change.tank_temp)?,
    })
}

/// Bare or quoted number. A blank string counts as left out.
fn parse_number(field: &'static str, value: &Option<WireNumber>) -> Result<Option<f64>, ApiError> {
    match value {
        None => Ok(None),
        Some(WireNumber::Number(n)) => Ok(Some(*n)),
        Some(WireNumber::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("{field} must be a number, got {s:?}")))
        }
    }
}

/// `"None"` (any case) or empty → diurnal model; a number, bare or quoted, is °F.
fn parse_fixed_temp(fixed: &FixedTemp) -> Result<Option<f64>, ApiError> {
    match fixed {
        FixedTemp::Degrees(f) => Ok(Some(fahrenheit_to_celsius(*f))),
        FixedTemp::Text(s) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("none") {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(|f| Some(fahrenheit_to_celsius(f)))
                .map_err(|_| ApiError::BadRequest(format!("fixedTemp must be a number or \"None\", got {s:?}")))
        }
    }
}

fn state_to_celsius(state: CurrentState) -> SimulationState {
    SimulationState {
        fluid_temp: fahrenheit_to_celsius(state.fluid_temp),
        plate_temp: fahrenheit_to_celsius(state.panel_temp),
        tank_temp: fahrenheit_to_celsius(state.tank_temp),
    }
}

fn to_point(result: &StepResult) -> TemperaturePoint {
    TemperaturePoint {
        time: result.step,
        fluid_temp: celsius_to_fahrenheit(result.fluid_temp),
        panel_temp: celsius_to_fahrenheit(result.plate_temp),
        tank_temp: celsius_to_fahrenheit(result.tank_temp),
        ambient_temp: celsius_to_fahrenheit(result.ambient_temp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn request(json: &str) -> SimulateRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_request_uses_defaults() {
        let defaults = SimulationDefaults::default();
        let run = build_run(&SimulateRequest::default(), &defaults).unwrap();
        assert_eq!(run.duration, 24);
        assert_eq!(run.parameters, SimulationParameters::default());
        assert_eq!(run.initial_fluid_temp, 20.0);
        assert!(run.resume_from.is_none());
    }

    #[test]
    fn temperatures_are_converted_to_celsius() {
        let req = request(
            r#"{ "fluidTemp": 68, "tankTemp": 212, "minAmbientTemp": 32, "maxAmbientTemp": 50, "fixedTemp": 41 }"#,
        );
        let run = build_run(&req, &SimulationDefaults::default()).unwrap();
        assert_relative_eq!(run.initial_fluid_temp, 20.0, max_relative = 1e-12);
        assert_relative_eq!(run.initial_tank_temp, 100.0, max_relative = 1e-12);
        assert_relative_eq!(run.parameters.min_ambient_temp, 0.0, epsilon = 1e-12);
        assert_relative_eq!(run.parameters.max_ambient_temp, 10.0, max_relative = 1e-12);
        assert_relative_eq!(run.parameters.fixed_ambient_temp.unwrap(), 5.0, max_relative = 1e-12);
    }

    #[test]
    fn fixed_temp_none_keyword() {
        let run = build_run(&request(r#"{ "fixedTemp": "None" }"#), &SimulationDefaults::default()).unwrap();
        assert_eq!(run.parameters.fixed_ambient_temp, None);

        let run = build_run(&request(r#"{ "fixedTemp": "50" }"#), &SimulationDefaults::default()).unwrap();
        assert_relative_eq!(run.parameters.fixed_ambient_temp.unwrap(), 10.0, max_relative = 1e-12);

        assert!(matches!(
            build_run(&request(r#"{ "fixedTemp": "warm" }"#), &SimulationDefaults::default()),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn quoted_numbers_are_accepted() {
        let req = request(
            r#"{ "efficiency": "0.5", "transmittance": " 0.9 ", "tankTemp": "212", "absorptance": "" }"#,
        );
        let run = build_run(&req, &SimulationDefaults::default()).unwrap();
        assert_eq!(run.parameters.panel_efficiency, 0.5);
        assert_eq!(run.parameters.transmittance, 0.9);
        assert_eq!(run.parameters.absorptance, SimulationDefaults::default().absorptance);
        assert_relative_eq!(run.initial_tank_temp, 100.0, max_relative = 1e-12);

        let req = request(r#"{ "inputChanges": { "4": { "pumpEfficiency": "0.6", "fluidTemp": "122" } } }"#);
        let schedule = build_schedule(&req).unwrap();
        assert_eq!(schedule[&4].pump_efficiency, Some(0.6));
        assert_relative_eq!(schedule[&4].fluid_temp.unwrap(), 50.0, max_relative = 1e-12);
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        let err = build_run(&request(r#"{ "efficiency": "high" }"#), &SimulationDefaults::default()).unwrap_err();
        assert!(matches!(&err, ApiError::BadRequest(msg) if msg.contains("efficiency")));

        let req = request(r#"{ "inputChanges": { "2": { "cloudCover": "lots" } } }"#);
        assert!(matches!(build_schedule(&req), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn input_changes_become_schedule() {
        let req = request(
            r#"{ "inputChanges": { "12": { "cloudCover": 50, "tankTemp": 122 }, "3": { "fixedTemp": "None" } } }"#,
        );
        let schedule = build_schedule(&req).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[&12].cloud_cover, Some(50.0));
        assert_relative_eq!(schedule[&12].tank_temp.unwrap(), 50.0, max_relative = 1e-12);
        assert_eq!(schedule[&3].fixed_ambient_temp, Some(None));
    }

    #[test]
    fn resume_state_is_converted() {
        let req = request(r#"{ "currentState": { "fluidTemp": 104, "panelTemp": 140, "tankTemp": 86 } }"#);
        let state = build_run(&req, &SimulationDefaults::default()).unwrap().resume_from.unwrap();
        assert_relative_eq!(state.fluid_temp, 40.0, max_relative = 1e-12);
        assert_relative_eq!(state.plate_temp, 60.0, max_relative = 1e-12);
        assert_relative_eq!(state.tank_temp, 30.0, max_relative = 1e-12);
    }

    #[test]
    fn run_returns_fahrenheit_points() {
        let req = request(r#"{ "fixedTemp": 68, "pumpPower": 0, "startHour": 20 }"#);
        let response = run(&req, &SimulationDefaults::default(), 8760).unwrap();
        assert_eq!(response.temperatures.len(), 4);
        assert_eq!(response.temperatures[0].time, 20);
        for point in &response.temperatures {
            assert_relative_eq!(point.ambient_temp, 68.0, max_relative = 1e-12);
            assert_relative_eq!(point.tank_temp, 68.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn run_enforces_duration_limit() {
        let req = request(r#"{ "duration": 100 }"#);
        assert!(matches!(run(&req, &SimulationDefaults::default(), 48), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn engine_errors_propagate() {
        let req = request(r#"{ "area": 0 }"#);
        assert!(matches!(run(&req, &SimulationDefaults::default(), 8760), Err(ApiError::Simulation(_))));
    }
}
