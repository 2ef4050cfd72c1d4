// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse record file: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("No record ids left after {0}")]
    IdExhausted(i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Password length {length} is out of range ({min}..={max})")]
    LengthOutOfRange { length: usize, min: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),
    #[error("CLI error: {0}")]
    Cli(String),
}

pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type GeneratorResult<T> = Result<T, GeneratorError>;
