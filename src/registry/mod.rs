//! Registry service facade and error taxonomy.

mod errors;
mod service;

pub use errors::{RegistryError, RegistryResult};
pub use service::Registry;
