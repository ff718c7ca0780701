//! CLI command implementations.

pub mod currencies;
pub mod endpoint;
pub mod search;

pub use currencies::list_currencies;
pub use endpoint::EndpointCommand;
pub use search::{SearchCommand, SearchOptions};
