use utoipa::OpenApi;
use crate::controllers::simulation_controller;
use crate::models::api;
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        simulation_controller::simulate,
        simulation_controller::get_defaults,
        simulation_controller::health
    ),
    components(
        schemas(
            api::SimulateRequest,
            api::InputChange,
            api::CurrentState,
            api::FixedTemp,
            api::WireNumber,
            api::SimulateResponse,
            api::TemperaturePoint,
            api::HealthStatus,
            config::SimulationDefaults
        )
    ),
    tags(
        (name = "solar-thermal-sim", description = "Solar Thermal Loop Simulation API")
    )
)]
pub struct ApiDoc;
