pub mod general;
pub mod logging;

use serde::Deserialize;
use config_rs;

use common::Thresholds;
use general::General;
use logging::Logging;

const CONFIGS: &[&str] = &["detector.toml"];

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub logging: Logging,
    pub glare: Thresholds,
}

impl Config {
    pub fn new() -> Config {
        match Config::build(None) {
            Ok(c) => c,
            Err(e) => panic!("loading config failed. {e}"),
        }
    }

    /// Embedded defaults, then `detector.toml` if present, then `overlay`.
    fn build(overlay: Option<&str>) -> Result<Config, config_rs::ConfigError> {
        let mut config_rs_builder = config_rs::Config::builder()
            .add_source(config_rs::File::from_str(include_str!("defaults/general.toml"), config_rs::FileFormat::Toml))
            .add_source(config_rs::File::from_str(include_str!("defaults/logging.toml"), config_rs::FileFormat::Toml))
            .add_source(config_rs::File::from_str(include_str!("defaults/glare.toml"), config_rs::FileFormat::Toml))
            ;
        for s in CONFIGS {
            config_rs_builder = config_rs_builder.add_source(config_rs::File::with_name(s).required(false));
        }
        if let Some(o) = overlay {
            config_rs_builder = config_rs_builder.add_source(config_rs::File::from_str(o, config_rs::FileFormat::Toml));
        }

        let config = config_rs_builder.build()?.try_deserialize::<Config>()?;
        if config.glare.min_altitude >= config.glare.max_altitude {
            return Err(config_rs::ConfigError::Message(format!(
                "glare.min_altitude ({min}) must be below glare.max_altitude ({max})",
                min = config.glare.min_altitude,
                max = config.glare.max_altitude,
            )));
        }
        Ok(config)
    }
}
