use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConverterError {
    #[error("converter task is no longer running")]
    Closed,
}
