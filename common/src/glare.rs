use chrono::{ DateTime, Utc };
use log::debug;
use serde::{ Deserialize, Deserializer, Serialize };

use crate::geometry::azimuthal_diff;
use crate::request::{ GlareRequest, RawGlareRequest };
use crate::solar::SolarPositionProvider;
use crate::GlareError;

/// Geometric window in which the sun shines into a forward-facing lens.
///
/// Both altitude bounds are exclusive, as is `max_azimuthal_diff`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(deserialize_with = "deserialize_azimuthal_diff")]
    pub max_azimuthal_diff: f64,
    #[serde(deserialize_with = "deserialize_altitude")]
    pub min_altitude: f64,
    #[serde(deserialize_with = "deserialize_altitude")]
    pub max_altitude: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds { max_azimuthal_diff: 30.0, min_altitude: 0.0, max_altitude: 45.0 }
    }
}

impl Thresholds {
    pub fn is_glare(&self, azimuthal_diff: f64, altitude: f64) -> bool {
        azimuthal_diff < self.max_azimuthal_diff
            && self.min_altitude < altitude
            && altitude < self.max_altitude
    }
}

fn deserialize_azimuthal_diff<'de, D>(d: D) -> Result<f64, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && value > 0.0 && value <= 180.0 { Ok(value) }
    else { Err(serde::de::Error::invalid_value(serde::de::Unexpected::Float(value), &"to be 0.0 < x <= 180.0")) }
}

fn deserialize_altitude<'de, D>(d: D) -> Result<f64, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && value >= -90.0 && value <= 90.0 { Ok(value) }
    else { Err(serde::de::Error::invalid_value(serde::de::Unexpected::Float(value), &"to be -90.0 <= x <= 90.0")) }
}

/// Validates `raw` and runs [`predict`] on the result.
pub fn predict_raw<P>(raw: &RawGlareRequest, provider: &P, thresholds: &Thresholds) -> Result<bool, GlareError>
where P: SolarPositionProvider + ?Sized {
    let request = raw.validate()?;
    predict(&request, provider, thresholds)
}

/// Decides whether the sun is low enough and close enough to the heading to
/// glare into a forward-facing camera.
pub fn predict<P>(request: &GlareRequest, provider: &P, thresholds: &Thresholds) -> Result<bool, GlareError>
where P: SolarPositionProvider + ?Sized {
    let at = to_instant(request.epoch())?;
    let position = provider.position(request.latitude(), request.longitude(), &at)?;
    let diff = azimuthal_diff(request.orientation(), position.azimuth);

    debug!("sun at azimuth={az:.2} altitude={alt:.2} for {at}; heading differs by {diff:.2}",
        az = position.azimuth,
        alt = position.altitude,
    );

    Ok(thresholds.is_glare(diff, position.altitude))
}

/// Seconds since the Unix epoch to a UTC instant, kept to the millisecond.
pub fn to_instant(epoch: f64) -> Result<DateTime<Utc>, GlareError> {
    let millis = (epoch * 1000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(GlareError::Epoch(epoch));
    }
    DateTime::from_timestamp_millis(millis as i64).ok_or(GlareError::Epoch(epoch))
}
