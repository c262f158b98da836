//! Provider factory trait and construction options.

use relay_llm::ChatProvider;

use crate::error::Error;

/// Options passed to a [`ProviderFactory`] when constructing a provider.
///
/// All state a provider needs is carried here explicitly — there is no
/// hidden environment lookup inside the registry.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// The provider identifier (e.g. `"google"`).
    pub id: String,

    /// API key. Factories decide whether absence is fatal.
    pub api_key: Option<String>,

    /// Base endpoint override. `None` means the provider's built-in default.
    pub api_endpoint: Option<String>,

    /// Tee response streams into the diagnostic log.
    pub debug: bool,
}

impl ProviderOptions {
    pub fn new(id: impl Into<String>) -> Self {
        ProviderOptions {
            id: id.into(),
            api_key: None,
            api_endpoint: None,
            debug: false,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

/// A factory that can construct a [`ChatProvider`] from [`ProviderOptions`].
pub trait ProviderFactory: Send + Sync {
    fn create(&self, options: ProviderOptions) -> Result<ChatProvider, Error>;
}

/// Blanket impl: any `Fn(ProviderOptions) -> Result<ChatProvider, Error>` is
/// a factory.
impl<F> ProviderFactory for F
where
    F: Fn(ProviderOptions) -> Result<ChatProvider, Error> + Send + Sync,
{
    fn create(&self, options: ProviderOptions) -> Result<ChatProvider, Error> {
        (self)(options)
    }
}
