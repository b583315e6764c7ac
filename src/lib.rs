//! lazydep - on-demand package cache
//!
//! Installs packages into a local cache the first time they are needed,
//! loads them from there afterwards, and reinstalls entries that fail to
//! load.

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod package;
pub mod process;
pub mod registry;
pub mod ui;

pub use error::{LazydepError, LazydepResult};
