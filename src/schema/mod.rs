//! Schema descriptor and structural validator.
//!
//! # Design principles
//!
//! - Closed world: a key not declared at its level is a validation error
//! - All declared keys are optional; only extra keys are fatal
//! - Exact shape matching, no coercion, no defaults
//! - Fail-fast with full key-path context
//! - Descriptors are injected values, never a module-level singleton

mod descriptor;
mod errors;
mod loader;
mod validator;

pub use descriptor::{Descriptor, KeyKind};
pub use errors::{SchemaError, SchemaResult};
pub use loader::{DescriptorLoadError, DescriptorLoader, LoaderResult, NamedDescriptor};
pub use validator::{json_type_name, validate, validate_object};
