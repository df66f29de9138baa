//! プロバイダファクトリー
//!
//! プロバイダタイプに基づいて適切なプロバイダを作成します。

use crate::domain::AnalysisFocus;
use crate::error::Error;
use crate::vision::driver::VisionDriver;
use crate::vision::image::TransportImage;
use crate::vision::mock::MockProvider;
use crate::vision::openai::OpenAiProvider;
use crate::vision::provider::VisionProvider;
use serde_json::Value;

/// プロバイダタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// OpenAI公式 (APIキー必須)
    Openai,
    /// OpenAI Chat Completions互換 (/chat/completions、認証任意)
    OpenAiCompat,
    /// モック（固定データを返すだけ）
    Mock,
}

impl ProviderType {
    /// 文字列からプロバイダタイプを解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "gpt" => Some(Self::Openai),
            "openai_compat" => Some(Self::OpenAiCompat),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    /// プロバイダタイプを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::OpenAiCompat => "openai_compat",
            Self::Mock => "mock",
        }
    }
}

/// プロバイダのenumラッパー
///
/// 異なるプロバイダタイプを型安全に扱うために使用します。
#[derive(Debug)]
pub enum AnyProvider {
    OpenAi(OpenAiProvider),
    Mock(MockProvider),
}

impl VisionProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            Self::OpenAi(p) => p.name(),
            Self::Mock(p) => p.name(),
        }
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        match self {
            Self::OpenAi(p) => p.make_http_request(request_json),
            Self::Mock(p) => p.make_http_request(request_json),
        }
    }

    fn make_identify_payload(&self, image: &TransportImage) -> Result<Value, Error> {
        match self {
            Self::OpenAi(p) => p.make_identify_payload(image),
            Self::Mock(p) => p.make_identify_payload(image),
        }
    }

    fn make_analysis_payload(
        &self,
        image: &TransportImage,
        focus: AnalysisFocus,
    ) -> Result<Value, Error> {
        match self {
            Self::OpenAi(p) => p.make_analysis_payload(image, focus),
            Self::Mock(p) => p.make_analysis_payload(image, focus),
        }
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        match self {
            Self::OpenAi(p) => p.parse_response_text(response_json),
            Self::Mock(p) => p.parse_response_text(response_json),
        }
    }
}

/// プロバイダを作成する
///
/// # Arguments
/// * `provider_type` - プロバイダタイプ
/// * `model` - モデル名（オプション、デフォルト値が使用される）
/// * `base_url` - ベースURL（Openai / OpenAiCompat用。Noneのとき各プロバイダのデフォルト）
/// * `api_key_env` - APIキーを読む環境変数名（Noneのとき各プロバイダのデフォルト）
/// * `temperature` - 温度（Noneのとき送らない）
///
/// # Errors
/// Openaiでキーが未設定・プレースホルダのままの場合はConfigurationエラー
/// （ネットワークに触れる前に返る）。
pub fn create_provider(
    provider_type: ProviderType,
    model: Option<String>,
    base_url: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f32>,
) -> Result<AnyProvider, Error> {
    match provider_type {
        ProviderType::Openai => {
            let provider = OpenAiProvider::new(model, base_url, api_key_env, temperature)?;
            Ok(AnyProvider::OpenAi(provider))
        }
        ProviderType::OpenAiCompat => {
            let provider = OpenAiProvider::compat(model, base_url, api_key_env, temperature)?;
            Ok(AnyProvider::OpenAi(provider))
        }
        ProviderType::Mock => Ok(AnyProvider::Mock(MockProvider::new())),
    }
}

/// ドライバーを作成する
///
/// ResolvedProviderのbase_url / api_key_env / temperatureを反映する場合は
/// `create_provider(..., resolved.base_url.clone(), resolved.api_key_env.clone(), resolved.temperature)`
/// のあと`VisionDriver::new(provider)`でドライバを組み立てる。
pub fn create_driver(
    provider_type: ProviderType,
    model: Option<String>,
) -> Result<VisionDriver<AnyProvider>, Error> {
    let provider = create_provider(provider_type, model, None, None, None)?;
    Ok(VisionDriver::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_from_str() {
        assert_eq!(ProviderType::from_str("openai"), Some(ProviderType::Openai));
        assert_eq!(ProviderType::from_str("OpenAI"), Some(ProviderType::Openai));
        assert_eq!(ProviderType::from_str("gpt"), Some(ProviderType::Openai));
        assert_eq!(
            ProviderType::from_str("openai_compat"),
            Some(ProviderType::OpenAiCompat)
        );
        assert_eq!(ProviderType::from_str("mock"), Some(ProviderType::Mock));
        assert_eq!(ProviderType::from_str("MOCK"), Some(ProviderType::Mock));
        assert_eq!(ProviderType::from_str("unknown"), None);
    }

    #[test]
    fn test_provider_type_as_str() {
        assert_eq!(ProviderType::Openai.as_str(), "openai");
        assert_eq!(ProviderType::OpenAiCompat.as_str(), "openai_compat");
        assert_eq!(ProviderType::Mock.as_str(), "mock");
    }

    #[test]
    fn test_create_provider_mock() {
        let p = create_provider(ProviderType::Mock, None, None, None, None).unwrap();
        assert_eq!(p.name(), "mock");
    }

    #[test]
    fn test_create_provider_openai_without_key_is_configuration_error() {
        let e = create_provider(
            ProviderType::Openai,
            None,
            None,
            Some("BREEDID_TEST_FACTORY_NO_KEY".to_string()),
            None,
        )
        .unwrap_err();
        assert_eq!(e.kind(), "configuration");
    }

    #[test]
    fn test_create_driver_mock() {
        let driver = create_driver(ProviderType::Mock, None).unwrap();
        assert_eq!(driver.provider().name(), "mock");
    }
}
