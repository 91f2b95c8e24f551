pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod resolver;
pub mod schema;
pub mod utils;
pub mod validate;
pub mod writer;

pub use config::Settings;
pub use error::GenerationFailed;
pub use pipeline::{GenerationOutcome, Pipeline};
