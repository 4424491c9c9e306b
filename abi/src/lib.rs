mod config;
mod error;
mod types;

pub use config::*;
pub use error::Error;
pub use types::*;
