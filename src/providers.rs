use std::sync::Arc;

use chat_provider::ChatProvider;
use chat_provider_mock::{MockProvider, MOCK_PROVIDER_ID};
use chat_provider_openai::{OpenAiProvider, OpenAiProviderConfig, OPENAI_PROVIDER_ID};

use crate::config::EnvConfig;
use crate::error::KitError;

pub const DEFAULT_PROVIDER_ID: &str = OPENAI_PROVIDER_ID;

/// Provider selected by `KIT_PROVIDER`, defaulting to OpenAI.
pub fn provider_from_env(env: &EnvConfig) -> Result<Arc<dyn ChatProvider>, KitError> {
    let provider_id = env
        .provider
        .as_deref()
        .map(str::trim)
        .unwrap_or(DEFAULT_PROVIDER_ID);
    provider_for_id(provider_id, env)
}

pub fn provider_for_id(
    provider_id: &str,
    env: &EnvConfig,
) -> Result<Arc<dyn ChatProvider>, KitError> {
    match provider_id {
        OPENAI_PROVIDER_ID => {
            let mut config =
                OpenAiProviderConfig::new(env.openai_api_key.clone().unwrap_or_default());
            if let Some(base_url) = &env.openai_base_url {
                config = config.with_base_url(base_url.clone());
            }
            let provider =
                OpenAiProvider::new(config).map_err(|error| KitError::Provider(error.to_string()))?;
            Ok(Arc::new(provider))
        }
        MOCK_PROVIDER_ID => Ok(Arc::new(MockProvider::default())),
        unknown => Err(KitError::Provider(format!(
            "Unsupported provider '{unknown}'. Available providers: {OPENAI_PROVIDER_ID}, {MOCK_PROVIDER_ID}"
        ))),
    }
}
