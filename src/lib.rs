pub mod args;
pub mod backup;
pub mod commands;
mod config;
pub mod engine;
mod error;
pub mod journal;
pub mod model;
pub mod render;
pub mod seed;
pub mod store;
pub mod summary;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{Error, ErrorType, IntoResult, Result};
