use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error("Invalid strand value: {0}")]
    InvalidStrand(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
