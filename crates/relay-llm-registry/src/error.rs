use relay_llm::RuntimeError;

/// Errors produced by the provider registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No provider with the given identifier is registered.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// A combined specifier did not look like `provider:model`.
    #[error("invalid model specifier '{0}', expected 'provider:model'")]
    InvalidSpecifier(String),

    /// The provider factory failed during construction (e.g. missing
    /// credentials). The underlying runtime error is preserved.
    #[error("provider construction failed: {0}")]
    Construction(#[from] RuntimeError),
}
