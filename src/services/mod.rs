pub mod collector;
pub mod irradiance;
pub mod simulation;
pub mod simulation_service;
pub mod tank;
pub mod units;
