pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod skills;
pub mod tools;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use config::*;
pub use discovery::*;
pub use error::{DiscoveryError, FetchError, RepoRefError};
pub use http::*;
pub use skills::*;
pub use tools::*;
pub use traits::*;
