// src/lib.rs
//! Password history core: an ordered record store with write-through JSON
//! persistence, plus the generator, configuration and CLI built on top of it.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod storage;
pub mod store;

pub use error::{AppError, AppResult, StoreError, StoreResult};
pub use models::{NewPasswordRecord, PasswordRecord};
pub use storage::{JsonFileStorage, RecordStorage};
pub use store::RecordStore;
