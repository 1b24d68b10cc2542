pub mod error;
pub mod geometry;
pub mod glare;
pub mod request;
pub mod solar;

pub use error::GlareError;
pub use glare::{ predict, predict_raw, Thresholds };
pub use request::{ GlareRequest, RawGlareRequest };
pub use solar::{ SolarPosition, SolarPositionProvider, Spa };
