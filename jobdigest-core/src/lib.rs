pub mod config;
pub mod error;
pub mod error_utils;
pub mod resume;
pub mod storage;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use storage::*;
pub use types::*;
