use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}
