pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod operation;
pub mod settings;
pub mod ui;

pub use error::{GatewayError, Result};
