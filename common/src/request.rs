use serde::{ Deserialize, Deserializer };
use serde_json::Value;

use crate::GlareError;

#[derive(Clone, Copy)]
struct Field {
    key: &'static str,
    label: &'static str,
}

const LATITUDE: Field = Field { key: "lat", label: "Latitude" };
const LONGITUDE: Field = Field { key: "lon", label: "Longitude" };
const EPOCH: Field = Field { key: "epoch", label: "Epoch" };
const ORIENTATION: Field = Field { key: "orientation", label: "Orientation" };

/// Request body as it arrives on the wire. A field is `None` only when its
/// key is absent; an explicit `null` is kept so it can be reported as such.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct RawGlareRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub lat: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub lon: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub epoch: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub orientation: Option<Value>,
}

fn deserialize_present<'de, D>(d: D) -> Result<Option<Value>, D::Error> where D: Deserializer<'de> {
    Value::deserialize(d).map(Some)
}

/// A request whose fields passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlareRequest {
    latitude: f64,
    longitude: f64,
    epoch: f64,
    orientation: f64,
}

impl GlareRequest {
    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
    pub fn epoch(&self) -> f64 { self.epoch }
    pub fn orientation(&self) -> f64 { self.orientation }
}

impl RawGlareRequest {
    /// Parses a request body. Anything other than a JSON object is rejected
    /// here; field level problems are left to [`RawGlareRequest::validate`].
    pub fn from_slice(body: &[u8]) -> Result<RawGlareRequest, GlareError> {
        match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(GlareError::Body(format!("expected a JSON object, got {other}"))),
        }
    }

    /// Checks lat, lon, epoch and orientation in that order and stops at the
    /// first field that fails.
    ///
    /// Latitude, longitude and orientation must be JSON floats: `45` is
    /// rejected while `45.0` is accepted. Epoch may be any positive number.
    pub fn validate(&self) -> Result<GlareRequest, GlareError> {
        let latitude = float_within(&self.lat, LATITUDE, 0.0, 90.0)?;
        let longitude = float_within(&self.lon, LONGITUDE, -180.0, 180.0)?;
        let epoch = positive_number(&self.epoch, EPOCH)?;
        let orientation = float_within(&self.orientation, ORIENTATION, -180.0, 180.0)?;

        Ok(GlareRequest { latitude, longitude, epoch, orientation })
    }
}

fn required(value: &Option<Value>, field: Field) -> Result<&Value, GlareError> {
    value.as_ref().ok_or(GlareError::MissingField { label: field.label, key: field.key })
}

fn float_within(value: &Option<Value>, field: Field, min: f64, max: f64) -> Result<f64, GlareError> {
    let value = required(value, field)?;
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if min < f && f < max => Ok(f),
            _ => Err(invalid(field, value, format!("a float within {min} to {max}"))),
        },
        _ => Err(invalid(field, value, format!("a float within {min} to {max}"))),
    }
}

fn positive_number(value: &Option<Value>, field: Field) -> Result<f64, GlareError> {
    let value = required(value, field)?;
    match value.as_f64() {
        Some(f) if f > 0.0 => Ok(f),
        _ => Err(invalid(field, value, format!("a number greater than 0"))),
    }
}

fn invalid(field: Field, value: &Value, expected: String) -> GlareError {
    GlareError::InvalidField { label: field.label, value: value.to_string(), expected }
}
