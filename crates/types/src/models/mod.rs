//! Shared domain models

pub mod chain;
pub mod secret_string;

pub use chain::{ChainDescriptor, ChainFamily};
pub use secret_string::SecretString;
