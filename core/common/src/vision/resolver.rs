//! profiles.jsonの読み込みとプロバイダ解決

use crate::domain::ProviderName;
use crate::error::Error;
use crate::ports::outbound::{EnvResolver, FileSystem};
use crate::vision::config::{ProfilesConfig, ProviderTypeKind};
use crate::vision::factory::ProviderType;

/// 解決済みプロバイダ（ProviderType + オプション）
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    /// 解決に使ったプロファイル名（例: "local", "openai"）。エラー表示用
    pub profile_name: String,
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
}

/// profiles.jsonを読み込む。ファイルが無ければOk(None)、JSONが壊れていればErr（メッセージにパス含める）
pub fn load_profiles_config(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
) -> Result<Option<ProfilesConfig>, Error> {
    let path = env.resolve_profiles_config_path()?;
    if !fs.exists(path.as_path()) {
        return Ok(None);
    }
    let contents = fs.read_to_string(path.as_path())?;
    ProfilesConfig::parse(&contents)
        .map_err(|e| Error::json(format!("{}: {}", path.display(), e)))
        .map(Some)
}

fn provider_type_kind_to_provider_type(k: ProviderTypeKind) -> ProviderType {
    match k {
        ProviderTypeKind::Openai => ProviderType::Openai,
        ProviderTypeKind::OpenaiCompat => ProviderType::OpenAiCompat,
        ProviderTypeKind::Mock => ProviderType::Mock,
    }
}

/// 利用可能なビルトインプロバイダ名
fn builtin_provider_names() -> &'static [&'static str] {
    &["gpt", "mock", "openai", "openai_compat"]
}

/// ビルトイン + profiles.json定義の利用可能なプロバイダ名（重複なし・未ソート）
pub fn available_provider_names(cfg: Option<&ProfilesConfig>) -> Vec<String> {
    let mut available: Vec<String> = builtin_provider_names()
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    if let Some(cfg) = cfg {
        for k in cfg.providers.keys() {
            if !available.contains(k) {
                available.push(k.clone());
            }
        }
    }
    available
}

/// 要求されたプロバイダ名（Noneの場合はdefault）とProfilesConfigからResolvedProviderを解決する。
/// 不明なプロバイダの場合はError::invalid_argument（is_usage == true）で利用可能一覧を返す。
pub fn resolve_provider(
    requested: Option<&ProviderName>,
    cfg: Option<&ProfilesConfig>,
) -> Result<ResolvedProvider, Error> {
    let effective_name: &str = requested.map(|r| r.as_ref()).unwrap_or_else(|| {
        cfg.and_then(|c| c.default_provider.as_deref())
            .unwrap_or("openai")
    });

    // 1) cfg.providersに名前があればそれを優先
    if let Some(cfg) = cfg {
        if let Some(profile) = cfg.providers.get(effective_name) {
            let provider_type = provider_type_kind_to_provider_type(profile.type_);
            return Ok(ResolvedProvider {
                profile_name: effective_name.to_string(),
                provider_type,
                base_url: profile.base_url.clone(),
                model: profile.model.clone(),
                api_key_env: profile.api_key_env.clone(),
                temperature: profile.temperature,
            });
        }
    }

    // 2) ビルトイン (ProviderType::from_str) を試す
    if let Some(provider_type) = ProviderType::from_str(effective_name) {
        return Ok(ResolvedProvider {
            profile_name: effective_name.to_string(),
            provider_type,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: None,
        });
    }

    // 3) どれも無ければusageエラー
    let mut available = available_provider_names(cfg);
    available.sort();
    Err(Error::invalid_argument(format!(
        "Unknown provider: '{}'. Available: {}",
        effective_name,
        available.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::config::ProviderProfile;

    #[test]
    fn test_resolve_provider_no_cfg_requested_none() {
        let r = resolve_provider(None, None).unwrap();
        assert_eq!(r.profile_name, "openai");
        assert_eq!(r.provider_type, ProviderType::Openai);
        assert!(r.model.is_none());
    }

    #[test]
    fn test_resolve_provider_no_cfg_requested_mock() {
        let name = ProviderName::new("mock");
        let r = resolve_provider(Some(&name), None).unwrap();
        assert_eq!(r.provider_type, ProviderType::Mock);
    }

    #[test]
    fn test_resolve_provider_no_cfg_unknown() {
        let name = ProviderName::new("unknown_provider");
        let e = resolve_provider(Some(&name), None).unwrap_err();
        assert!(e.is_usage());
        assert!(e.to_string().contains("Unknown provider"));
        assert!(e.to_string().contains("unknown_provider"));
        assert!(e.to_string().contains("Available"));
    }

    #[test]
    fn test_resolve_provider_cfg_default_provider() {
        let cfg = ProfilesConfig {
            default_provider: Some("my_openai".to_string()),
            providers: {
                let mut m = std::collections::HashMap::new();
                m.insert(
                    "my_openai".to_string(),
                    ProviderProfile {
                        type_: ProviderTypeKind::Openai,
                        base_url: Some("https://my.api/v1".to_string()),
                        model: Some("gpt-4o-mini".to_string()),
                        api_key_env: Some("MY_KEY".to_string()),
                        temperature: Some(0.7),
                    },
                );
                m
            },
        };
        let r = resolve_provider(None, Some(&cfg)).unwrap();
        assert_eq!(r.profile_name, "my_openai");
        assert_eq!(r.provider_type, ProviderType::Openai);
        assert_eq!(r.base_url.as_deref(), Some("https://my.api/v1"));
        assert_eq!(r.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(r.api_key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(r.temperature, Some(0.7));
    }

    #[test]
    fn test_resolve_provider_cfg_requested_overrides_default() {
        let cfg = ProfilesConfig {
            default_provider: Some("openai".to_string()),
            providers: std::collections::HashMap::new(),
        };
        let name = ProviderName::new("mock");
        let r = resolve_provider(Some(&name), Some(&cfg)).unwrap();
        assert_eq!(r.provider_type, ProviderType::Mock);
    }

    #[test]
    fn test_resolve_provider_cfg_unknown_provider_lists_available() {
        let cfg = ProfilesConfig {
            default_provider: None,
            providers: {
                let mut m = std::collections::HashMap::new();
                m.insert(
                    "my_custom".to_string(),
                    ProviderProfile {
                        type_: ProviderTypeKind::Mock,
                        base_url: None,
                        model: None,
                        api_key_env: None,
                        temperature: None,
                    },
                );
                m
            },
        };
        let name = ProviderName::new("nonexistent");
        let e = resolve_provider(Some(&name), Some(&cfg)).unwrap_err();
        assert!(e.is_usage());
        let msg = e.to_string();
        assert!(msg.contains("nonexistent"));
        assert!(msg.contains("my_custom"));
        assert!(msg.contains("openai"));
    }

    #[test]
    fn test_load_profiles_config_missing_file_is_none() {
        use crate::adapter::StdFileSystem;
        use crate::domain::HomeDir;
        use crate::ports::outbound::EnvResolver;

        struct TempEnv(std::path::PathBuf);
        impl EnvResolver for TempEnv {
            fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
                Ok(HomeDir::new(self.0.clone()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let env = TempEnv(dir.path().to_path_buf());
        let cfg = load_profiles_config(&StdFileSystem, &env).unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn test_load_profiles_config_broken_json_is_error_with_path() {
        use crate::adapter::StdFileSystem;
        use crate::domain::HomeDir;
        use crate::ports::outbound::EnvResolver;

        struct TempEnv(std::path::PathBuf);
        impl EnvResolver for TempEnv {
            fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
                Ok(HomeDir::new(self.0.clone()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("profiles.json"), "{ broken").unwrap();
        let env = TempEnv(dir.path().to_path_buf());
        let e = load_profiles_config(&StdFileSystem, &env).unwrap_err();
        assert_eq!(e.kind(), "json");
        assert!(e.to_string().contains("profiles.json"));
    }
}
