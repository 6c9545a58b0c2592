pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod transform;

pub use error::{Error, ErrorKind, Result};

// Declare tests module only when testing
#[cfg(test)]
pub mod tests;
