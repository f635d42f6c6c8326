use edvox_text::TextError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Text(#[from] TextError),

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}

impl CoreError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;
    use edvox_text::TextError;

    #[test]
    fn text_errors_convert_transparently() {
        let err: CoreError = TextError::layout("gone").into();
        assert_eq!(err.to_string(), "line layout unavailable: gone");
    }

    #[test]
    fn invalid_config_names_problem() {
        let err = CoreError::invalid_config("empty mask");
        assert_eq!(err.to_string(), "invalid config: empty mask");
    }
}
