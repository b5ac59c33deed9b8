//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `operation_mode`: Operation mode selection and validation
//! - `field_resolution`: Token, repository URL, file and title resolution

mod field_resolution;
mod helpers;
