//! profiles.json経由でプロバイダを組み立てるProviderFactory実装

use crate::ports::outbound::ProviderFactory;
use common::domain::{ModelName, ProviderName};
use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem};
use common::vision::{create_provider, load_profiles_config, resolve_provider, AnyProvider};
use std::sync::Arc;

/// profiles.json + ビルトイン名からプロバイダを組み立てる標準実装
pub struct StdProviderFactory {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl StdProviderFactory {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }
}

impl ProviderFactory for StdProviderFactory {
    fn create(
        &self,
        profile: Option<&ProviderName>,
        model: Option<&ModelName>,
    ) -> Result<(String, AnyProvider), Error> {
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        let resolved = resolve_provider(profile, cfg.as_ref())?;
        // -m指定はプロファイルのモデルより優先
        let model = model
            .map(|m| m.as_ref().to_string())
            .or_else(|| resolved.model.clone());
        let provider = create_provider(
            resolved.provider_type,
            model,
            resolved.base_url.clone(),
            resolved.api_key_env.clone(),
            resolved.temperature,
        )?;
        Ok((resolved.profile_name, provider))
    }
}
