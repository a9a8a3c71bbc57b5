pub mod config;
pub mod error;
pub mod openai;
pub mod provider;
pub mod retry;

pub use config::*;
pub use error::*;
pub use openai::*;
pub use provider::*;
pub use retry::*;
