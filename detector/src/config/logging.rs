use std::path::PathBuf;

use log::LevelFilter;
use serde::{ Deserialize, Deserializer, de::Unexpected };

#[derive(Debug, Deserialize)]
pub struct Logging {
    #[serde(deserialize_with = "deserialize_level")]
    pub level: LevelFilter,
    pub path: PathBuf,
    /// Rollover size in MiB.
    #[serde(deserialize_with = "deserialize_positive")]
    pub size: u64,
    #[serde(deserialize_with = "deserialize_positive")]
    pub count: u32,
}

fn deserialize_level<'de, D>(d: D) -> Result<LevelFilter, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    match s.to_ascii_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &"off, error, warn, info, debug or trace")),
    }
}

fn deserialize_positive<'de, D, T>(d: D) -> Result<T, D::Error>
where D: Deserializer<'de>, T: std::str::FromStr + PartialOrd + Default, T::Err: std::fmt::Display {
    let s = String::deserialize(d)?;
    match s.parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        Ok(_) => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &"to be greater than zero. (logging)")),
        Err(e) => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &format!("to be a positive integer. (logging) {e}").as_str())),
    }
}
