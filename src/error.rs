// Typed errors with thiserror. Only the host boundary is fallible;
// the engine itself absorbs bad input by clamping and wrapping.

use thiserror::Error;

/// Carousel error types.
#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid move target {target:?}: expected \"next\", \"prev\" or an index")]
    InvalidTarget { target: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CarouselError {
    fn from(err: serde_json::Error) -> Self {
        CarouselError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CarouselError::InvalidConfig("displayed must be a number".to_string());
        assert!(err.to_string().contains("displayed must be a number"));

        let err = CarouselError::InvalidTarget {
            target: "up".to_string(),
        };
        assert!(err.to_string().contains("\"up\""));
    }

    #[test]
    fn converts_serde_errors() {
        let err: CarouselError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CarouselError::Serialization(_)));
    }
}
