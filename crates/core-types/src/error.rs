use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid trade field '{0}': {1}")]
    InvalidInput(String, String),
}
