use thiserror::Error;

/// Everything that can keep a request from producing a glare verdict.
///
/// The rendered message is the `detail` sent back to clients, so every
/// variant names the field or stage that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlareError {
    #[error("{label}: missing field '{key}'.")]
    MissingField { label: &'static str, key: &'static str },

    #[error("{label}: {value} is not {expected}.")]
    InvalidField { label: &'static str, value: String, expected: String },

    #[error("Epoch: {0} is out of range for a UTC timestamp.")]
    Epoch(f64),

    #[error("solar position unavailable. {0}")]
    Provider(String),

    #[error("malformed request body. {0}")]
    Body(String),
}

impl GlareError {
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for GlareError {
    fn from(e: serde_json::Error) -> Self {
        GlareError::Body(e.to_string())
    }
}
