//! Configuration
//!
//! Settings loading, validation, and the shared error type.

pub mod settings;
pub mod types;
pub mod validator;
