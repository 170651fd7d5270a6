pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod levels;
pub mod mass;
pub mod math;
pub mod operations;
pub mod site;

pub use config::MassingConfig;
pub use diagnostics::Diagnostics;
pub use error::{MassingError, Result};
