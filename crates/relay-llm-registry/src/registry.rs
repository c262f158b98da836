//! The core registry: provider identifiers mapped to factories, with lazy,
//! cached construction.

use std::collections::HashMap;

use relay_llm::{ChatProvider, ChatRequest, ChatStream};

use crate::error::Error;
use crate::factory::{ProviderFactory, ProviderOptions};

struct ProviderEntry {
    factory: Box<dyn ProviderFactory>,
    options: ProviderOptions,
    instance: Option<ChatProvider>,
}

/// Central registry keyed on provider identifier.
///
/// Providers are constructed on first use and cached; a construction failure
/// (e.g. missing credentials) is returned on every lookup until the provider
/// is re-registered with new options.
///
/// # Example
///
/// ```ignore
/// use relay_llm_registry::{ProviderOptions, Registry};
///
/// let mut registry = Registry::new();
/// relay_llm_google::register(&mut registry, ProviderOptions::new("google").api_key(key));
///
/// let stream = registry.chat("google:gemini-pro", request)?;
/// ```
pub struct Registry {
    providers: HashMap<String, ProviderEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            providers: HashMap::new(),
        }
    }

    /// Register a provider factory under `options.id`, replacing any earlier
    /// registration (and its cached instance).
    pub fn add_provider(&mut self, options: ProviderOptions, factory: impl ProviderFactory + 'static) {
        self.providers.insert(
            options.id.clone(),
            ProviderEntry {
                factory: Box::new(factory),
                options,
                instance: None,
            },
        );
    }

    pub fn has_provider(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Registered provider identifiers, sorted.
    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Obtain the provider for the given identifier, constructing it on
    /// first use.
    pub fn provider(&mut self, id: &str) -> Result<&ChatProvider, Error> {
        let entry = self
            .providers
            .get_mut(id)
            .ok_or_else(|| Error::ProviderNotFound(id.to_string()))?;

        if entry.instance.is_none() {
            entry.instance = Some(entry.factory.create(entry.options.clone())?);
        }
        Ok(entry.instance.as_ref().expect("instance just constructed"))
    }

    /// Route a request through a combined `"provider:model"` specifier. The
    /// model named by the specifier overrides the one in the request.
    pub fn chat(&mut self, specifier: &str, mut request: ChatRequest) -> Result<ChatStream, Error> {
        let (provider_id, model_id) = split_specifier(specifier)?;
        let provider = self.provider(&provider_id)?;
        request.model = model_id;
        Ok(provider.chat(request))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a `"provider:model"` specifier.
pub fn split_specifier(specifier: &str) -> Result<(String, String), Error> {
    match specifier.split_once(':') {
        Some((provider, model)) if !provider.is_empty() && !model.is_empty() => {
            Ok((provider.to_string(), model.to_string()))
        }
        _ => Err(Error::InvalidSpecifier(specifier.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_llm::{ChatProviderBackend, RuntimeError, request};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullBackend;

    impl ChatProviderBackend for NullBackend {
        fn name(&self) -> &str {
            "null"
        }

        fn chat(&self, _request: ChatRequest) -> ChatStream {
            ChatStream::new(tokio_stream::empty())
        }
    }

    #[test]
    fn constructs_lazily_and_caches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_factory = Arc::clone(&calls);

        let mut registry = Registry::new();
        registry.add_provider(ProviderOptions::new("null"), move |_options| {
            calls_in_factory.fetch_add(1, Ordering::SeqCst);
            Ok(ChatProvider::new(NullBackend))
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        registry.provider("null").unwrap();
        registry.provider("null").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.provider("nope"),
            Err(Error::ProviderNotFound(_))
        ));
    }

    #[test]
    fn construction_failure_is_surfaced() {
        let mut registry = Registry::new();
        registry.add_provider(ProviderOptions::new("broken"), |_options| {
            Err(Error::Construction(RuntimeError::invalid_credential(
                "broken",
            )))
        });

        assert!(matches!(
            registry.provider("broken"),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn chat_routes_by_specifier_and_overrides_model() {
        let mut registry = Registry::new();
        registry.add_provider(ProviderOptions::new("null"), |_options| {
            Ok(ChatProvider::new(NullBackend))
        });

        let req = request("ignored-model").build();
        assert!(registry.chat("null:some-model", req).is_ok());

        let req = request("ignored-model").build();
        assert!(matches!(
            registry.chat("no-colon", req),
            Err(Error::InvalidSpecifier(_))
        ));
    }
}
