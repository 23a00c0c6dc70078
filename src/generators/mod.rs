// src/generators/mod.rs
use thiserror::Error;

pub mod charset;
pub mod password;

pub use charset::{CharsetPolicy, Pool, SPECIAL_CHARACTERS};
pub use password::{generate, generate_password, PasswordRequest};

/// Rejections raised before any randomness is consumed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("At least one character category must be enabled")]
    NoPoolsSelected,

    #[error("Length must be at least {required} when {required} charsets are selected (got {length})")]
    LengthTooShort { length: usize, required: usize },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
