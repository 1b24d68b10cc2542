use chrono::{ DateTime, Utc };
use solar_positioning::{ spa, time::DeltaT };

use crate::GlareError;

/// Where the sun is, seen from one spot on the ground at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Degrees from true north, clockwise, in [0, 360).
    pub azimuth: f64,
    /// Degrees above the horizon; negative at night.
    pub altitude: f64,
}

/// Source of solar positions. Anything that answers these two questions can
/// drive the predictor, including fixed values in tests.
pub trait SolarPositionProvider {
    fn azimuth(&self, latitude: f64, longitude: f64, at: &DateTime<Utc>) -> Result<f64, GlareError>;

    fn altitude(&self, latitude: f64, longitude: f64, at: &DateTime<Utc>) -> Result<f64, GlareError>;

    fn position(&self, latitude: f64, longitude: f64, at: &DateTime<Utc>) -> Result<SolarPosition, GlareError> {
        Ok(SolarPosition {
            azimuth: self.azimuth(latitude, longitude, at)?,
            altitude: self.altitude(latitude, longitude, at)?,
        })
    }
}

/// NREL's Solar Position Algorithm, observer at sea level, no refraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spa;

impl Spa {
    fn compute(&self, latitude: f64, longitude: f64, at: &DateTime<Utc>) -> Result<SolarPosition, GlareError> {
        let delta_t = DeltaT::estimate_from_date_like(*at)
            .map_err(|e| GlareError::Provider(format!("no delta T for {at}. {e}")))?;
        let pos = spa::solar_position(*at, latitude, longitude, 0.0, delta_t, None)
            .map_err(|e| GlareError::Provider(e.to_string()))?;

        Ok(SolarPosition { azimuth: pos.azimuth(), altitude: pos.elevation_angle() })
    }
}

impl SolarPositionProvider for Spa {
    fn azimuth(&self, latitude: f64, longitude: f64, at: &DateTime<Utc>) -> Result<f64, GlareError> {
        self.compute(latitude, longitude, at).map(|p| p.azimuth)
    }

    fn altitude(&self, latitude: f64, longitude: f64, at: &DateTime<Utc>) -> Result<f64, GlareError> {
        self.compute(latitude, longitude, at).map(|p| p.altitude)
    }

    fn position(&self, latitude: f64, longitude: f64, at: &DateTime<Utc>) -> Result<SolarPosition, GlareError> {
        self.compute(latitude, longitude, at)
    }
}
