use std::error::Error;
use std::fmt;

/// ConfigurationError is used if some simulation option or parameter does not fulfill the posed
/// requirements, e.g., a track with less than two waypoints or a buffer without capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationError;

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid configuration")
    }
}

impl Error for ConfigurationError {}

/// lerp returns the linearly interpolated value between a (t = 0) and b (t = 1). t is not
/// clamped.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// kmh_to_mps converts a velocity from km/h to m/s.
pub fn kmh_to_mps(vel: f64) -> f64 {
    vel * 1000.0 / 3600.0
}
