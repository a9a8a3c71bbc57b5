pub mod admin;
pub mod prompts;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;

pub use admin::*;
pub use schema::*;
pub use service::*;
pub use store::*;
pub use validation::*;
