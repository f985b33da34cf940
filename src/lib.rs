//! Retirement countdown: statutory retirement date resolution, daily and
//! career time distribution, countdown formatting, and the stores and
//! widget bridge that feed them.

pub mod cli;
pub mod clock;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod profile_store;
pub mod utils;
pub mod widget;

pub use error::{Error, Result};
