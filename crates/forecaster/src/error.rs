use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Cannot forecast from an empty sales history")]
    EmptyInput,
}
