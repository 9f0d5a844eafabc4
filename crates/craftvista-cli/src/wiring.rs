//! Builds the adapters named in [`AppConfig`].

use std::sync::Arc;

use craftvista_adapters::{
    GeminiGenerator, GoogleIdentityProvider, InMemoryListingStore, JsonFileStore,
    StaticIdentityProvider, TemplateGenerator,
};
use craftvista_core::{
    application::{ApplicationError, ContentGenerator, IdentityProvider, ListingStore},
    error::CraftError,
};
use tracing::debug;

use crate::{
    config::{AppConfig, GeneratorProvider, IdentityProviderKind, StoreBackend},
    error::CliResult,
};

pub fn identity(config: &AppConfig) -> CliResult<Arc<dyn IdentityProvider>> {
    debug!(provider = ?config.identity.provider, "Building identity provider");
    Ok(match config.identity.provider {
        IdentityProviderKind::Static => Arc::new(StaticIdentityProvider::demo()),
        IdentityProviderKind::Google => {
            let provider = GoogleIdentityProvider::new(&config.identity.tokeninfo_url)
                .map_err(|e| CraftError::from(ApplicationError::Auth(e)))?;
            match &config.identity.audience {
                Some(audience) => Arc::new(provider.with_audience(audience)),
                None => Arc::new(provider),
            }
        }
    })
}

pub fn generator(config: &AppConfig) -> CliResult<Arc<dyn ContentGenerator>> {
    let section = &config.generator;
    debug!(provider = ?section.provider, model = %section.model, "Building content generator");
    Ok(match section.provider {
        GeneratorProvider::Template => Arc::new(TemplateGenerator::new()),
        GeneratorProvider::Gemini => {
            let generator = GeminiGenerator::from_env(&section.api_key_env, &section.model)
                .map_err(|e| CraftError::from(ApplicationError::Generation(e)))?;
            match &section.base_url {
                Some(url) => Arc::new(generator.with_base_url(url)),
                None => Arc::new(generator),
            }
        }
    })
}

pub fn store(config: &AppConfig) -> Arc<dyn ListingStore> {
    match config.store.backend {
        StoreBackend::Memory => Arc::new(InMemoryListingStore::new()),
        StoreBackend::File => {
            let root = config.store.resolved_path();
            debug!(root = %root.display(), "Using JSON file store");
            Arc::new(JsonFileStore::new(root))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn defaults_build_offline_adapters() {
        let config = AppConfig::default();
        assert!(identity(&config).is_ok());
        assert!(generator(&config).is_ok());
        let _ = store(&config);
    }

    #[test]
    fn gemini_without_key_is_a_configuration_error() {
        let mut config = AppConfig::default();
        config.generator.provider = GeneratorProvider::Gemini;
        config.generator.api_key_env = "CRAFTVISTA_TEST_KEY_THAT_IS_NEVER_SET".into();

        let err = generator(&config).err().expect("missing key must fail");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 4);
    }
}
