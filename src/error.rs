use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Error, Debug, Clone)]
pub enum ForecastError {
    #[error("dimensions don't match: {message}")]
    InvalidDimensions { message: String },

    #[error("survival data is broken: {message}")]
    InvalidSurvivalData { message: String },

    #[error("numerical issues: {message}")]
    NumericalError { message: String },
}

impl ForecastError {
    pub fn invalid_dimensions(message: impl Into<String>) -> Self {
        Self::InvalidDimensions { message: message.into() }
    }

    pub fn invalid_survival_data(message: impl Into<String>) -> Self {
        Self::InvalidSurvivalData { message: message.into() }
    }

    pub fn numerical_error(message: impl Into<String>) -> Self {
        Self::NumericalError { message: message.into() }
    }
}
