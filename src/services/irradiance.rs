//! ============================================================
//!  Simplified clear-day irradiance model
//!
//!   - fixed day length: sunrise 06:00, sunset 18:00
//!   - squared-sine day curve peaking at solar noon
//!   - linear cloud attenuation
//!   - output in MJ/m² per hour
//! ============================================================

use std::f64::consts::PI;

// ─── Constants ───────────────────────────────────────────────
pub const SUNRISE_HOUR: f64 = 6.0;
pub const SUNSET_HOUR: f64 = 18.0;
/// Irradiance at solar noon under a clear sky (W/m²)
pub const PEAK_IRRADIANCE_W_M2: f64 = 1000.0;
/// W/m² sustained for one hour → MJ/m²
pub const W_M2_TO_MJ_M2_H: f64 = 0.0036;

/// Solar irradiance at `hour` of day (MJ/m²/h).
///
/// Zero outside daylight hours. `cloud_cover_percent` scales the result by
/// `1 - cloud/100` and is not clamped, so values outside 0..=100 are the
/// caller's problem.
pub fn irradiance(hour: f64, cloud_cover_percent: f64) -> f64 {
    if !(SUNRISE_HOUR..=SUNSET_HOUR).contains(&hour) {
        return 0.0;
    }

    let angle = PI * (hour - SUNRISE_HOUR) / (SUNSET_HOUR - SUNRISE_HOUR);
    let w_m2 = PEAK_IRRADIANCE_W_M2 * (angle - PI / 2.0).cos().powi(2);

    w_m2 * (1.0 - cloud_cover_percent / 100.0) * W_M2_TO_MJ_M2_H
}
