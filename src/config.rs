use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::simulation::SimulationParameters;

fn default_max_duration_steps() -> u32 { 8760 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub defaults: SimulationDefaults,
    /// Longest run a single request may ask for (steps)
    #[serde(default = "default_max_duration_steps")]
    pub max_duration_steps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served as the fallback (frontend build)
    #[serde(default)]
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    pub allow_any_origin: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// JSON lines instead of human-readable output
    pub json: bool,
}

/// Values used for anything a simulate request leaves out. Temperatures °C.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationDefaults {
    pub area: f64,
    pub efficiency: f64,
    pub pump_power: f64,
    pub hour: f64,
    pub duration: u32,
    pub time_step: f64,
    pub min_ambient_temp: f64,
    pub max_ambient_temp: f64,
    pub cloud_cover: f64,
    pub specific_heat: f64,
    pub fluid_temp: f64,
    pub transmittance: f64,
    pub absorptance: f64,
    pub tank_volume: f64,
    pub tank_temp: f64,
    pub pump_efficiency: f64,
    pub hydraulic_head: f64,
    #[serde(rename = "U_L")]
    pub u_l: f64,
    pub density: f64,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        let p = SimulationParameters::default();
        Self {
            area: p.panel_area,
            efficiency: p.panel_efficiency,
            pump_power: p.pump_power,
            hour: 0.0,
            duration: 24,
            time_step: p.time_step_seconds,
            min_ambient_temp: p.min_ambient_temp,
            max_ambient_temp: p.max_ambient_temp,
            cloud_cover: p.cloud_cover,
            specific_heat: p.fluid_specific_heat,
            fluid_temp: 20.0,
            transmittance: p.transmittance,
            absorptance: p.absorptance,
            tank_volume: p.tank_volume,
            tank_temp: 20.0,
            pump_efficiency: p.pump_efficiency,
            hydraulic_head: p.hydraulic_head,
            u_l: p.heat_loss_coefficient,
            density: p.fluid_density,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "server": { "port": 3001 } }"#).unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.max_duration_steps, 8760);
        assert!(!config.logging.json);
        assert_eq!(config.defaults, SimulationDefaults::default());
        assert_eq!(config.defaults.u_l, 8.0);
        assert_eq!(config.defaults.specific_heat, 4186.0);
    }

    #[test]
    fn partial_defaults_override() {
        let config: Config = serde_json::from_str(
            r#"{ "server": { "port": 8080 }, "defaults": { "area": 4.0, "U_L": 5.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.defaults.area, 4.0);
        assert_eq!(config.defaults.u_l, 5.0);
        assert_eq!(config.defaults.duration, 24);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/config.json").is_err());
    }
}
