pub mod config;
pub mod error;
pub mod types;

pub use config::{AiProvider, Config};
pub use error::PlainreadError;
pub use types::*;
