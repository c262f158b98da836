//! Registry integration for the Google provider.

use relay_llm_registry::{Error, ProviderOptions, Registry};

use crate::{DEFAULT_BASE_URL, GoogleConfig, provider};

/// Register the Google provider with the given registry under `options.id`.
///
/// The factory maps [`ProviderOptions`] onto [`GoogleConfig`]; construction
/// failures (missing API key) surface as [`Error::Construction`] on first
/// lookup.
pub fn register(registry: &mut Registry, options: ProviderOptions) {
    registry.add_provider(options, |options: ProviderOptions| {
        provider(GoogleConfig {
            api_key: options.api_key.unwrap_or_default(),
            base_url: options
                .api_endpoint
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            debug: options.debug,
        })
        .map_err(Error::from)
    });
}
