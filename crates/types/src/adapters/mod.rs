//! Adapter error types shared by aggregator and wallet adapters

pub mod errors;

pub use errors::AdapterError;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;
