//! Registry integration for the OpenAI provider.

use relay_llm_registry::{Error, ProviderOptions, Registry};

use crate::{DEFAULT_BASE_URL, OpenAIConfig, provider};

/// Register the OpenAI provider with the given registry under `options.id`.
pub fn register(registry: &mut Registry, options: ProviderOptions) {
    registry.add_provider(options, |options: ProviderOptions| {
        provider(OpenAIConfig {
            api_key: options.api_key.unwrap_or_default(),
            base_url: options
                .api_endpoint
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            debug: options.debug,
        })
        .map_err(Error::from)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_under_custom_id_and_endpoint() {
        let mut registry = Registry::new();
        register(
            &mut registry,
            ProviderOptions::new("openai-proxy")
                .api_key("test")
                .api_endpoint("https://proxy.internal/v1"),
        );
        assert!(registry.has_provider("openai-proxy"));
        assert_eq!(registry.provider("openai-proxy").unwrap().name(), "openai");
    }
}
