//! # relay-llm-registry
//!
//! A provider registry for the relay-llm adapter layer. Vendors are
//! registered under a provider identifier with a factory closure; providers
//! are constructed lazily with explicit [`ProviderOptions`] (no environment
//! lookups inside the registry) and cached for reuse.
//!
//! ```ignore
//! use relay_llm_registry::{ProviderOptions, Registry};
//!
//! let mut registry = Registry::new();
//! relay_llm_google::register(
//!     &mut registry,
//!     ProviderOptions::new("google").api_key(api_key),
//! );
//!
//! let stream = registry.chat("google:gemini-pro", request)?;
//! ```

pub mod error;
pub mod factory;
pub mod registry;

pub use error::Error;
pub use factory::{ProviderFactory, ProviderOptions};
pub use registry::{Registry, split_specifier};
