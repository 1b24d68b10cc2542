/// Maps an azimuth in [0, 360) onto [-180, 180] so it can be compared with a
/// signed vehicle heading.
pub fn normalize_azimuth(degrees: f64) -> f64 {
    if degrees > 180.0 {
        return degrees - 360.0;
    }
    degrees
}

/// Absolute separation between the travel direction and the sun.
pub fn azimuthal_diff(orientation: f64, azimuth: f64) -> f64 {
    (orientation - normalize_azimuth(azimuth)).abs()
}
