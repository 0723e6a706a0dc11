//! Infrastructure layer: professor/user storage and process configuration.

pub mod config;
pub mod store;
