pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod exchanges;
pub mod logging;
pub mod occ;
pub mod report;
pub mod spread;

pub use config::Config;
pub use error::{Error, Result};
