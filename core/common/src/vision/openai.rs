//! OpenAI Chat Completions (/chat/completions) プロバイダ
//!
//! base_urlで任意の互換エンドポイントを指定可能。画像はimage_urlの
//! contentパートとして渡し、品種判定はjson_schemaのresponse_formatで
//! 構造化出力を強制する。

use crate::domain::AnalysisFocus;
use crate::error::Error;
use crate::vision::image::TransportImage;
use crate::vision::provider::VisionProvider;
use crate::vision::schema::breed_identification_response_format;
use serde_json::{json, Value};
use std::env;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 未設定のまま残されがちなプレースホルダ。これが入っていても未設定扱い
const API_KEY_PLACEHOLDER: &str = "your-openai-api-key-here";

/// 追加分析（自由記述）の出力トークン上限
const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// 品種判定のシステム指示（専門家ペルソナ + 例示的な品種語彙）
///
/// 語彙はヒントであって制約ではない。モデルはこのリスト外の品種も返せる。
const IDENTIFY_SYSTEM_PROMPT: &str = "You are an expert veterinary specialist and livestock breed identification expert. \
Analyze the uploaded image to identify the cattle or buffalo breed with high accuracy. \
Consider physical characteristics like body structure, color patterns, facial features, \
horn shape, ear size, and other distinguishing features.\n\n\
Focus on identifying common Indian and international cattle breeds including:\n\
- Gir, Sahiwal, Red Sindhi, Tharparkar, Rathi, Hariana, Ongole\n\
- Holstein Friesian, Jersey, Brown Swiss, Simmental\n\
- Murrah Buffalo, Nili-Ravi Buffalo, Surti Buffalo\n\n\
Provide detailed analysis with confidence levels and breed characteristics.";

const IDENTIFY_USER_PROMPT: &str =
    "Please identify the cattle or buffalo breed in this image and provide detailed information about it.";

/// OpenAI Chat Completionsプロバイダ
#[derive(Debug)]
pub struct OpenAiProvider {
    model: String,
    base_url: String,
    api_key: Option<String>,
    temperature: Option<f32>,
}

impl OpenAiProvider {
    /// 公式エンドポイント向けのプロバイダを作成
    ///
    /// * `model` - モデル名（Noneのとき "gpt-4o"）
    /// * `base_url` - ベースURL（Noneのとき公式）
    /// * `api_key_env` - APIキーを読む環境変数名（Noneのとき OPENAI_API_KEY）
    /// * `temperature` - 温度（Noneのとき送らない）
    ///
    /// # Errors
    /// キーが未設定・空・プレースホルダのままの場合はConfigurationエラー。
    /// ネットワークに触れる前に検出される。
    pub fn new(
        model: Option<String>,
        base_url: Option<String>,
        api_key_env: Option<String>,
        temperature: Option<f32>,
    ) -> Result<Self, Error> {
        let env_name = api_key_env.unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = resolve_api_key(&env_name)?;
        Ok(Self {
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: normalize_base_url(base_url),
            api_key: Some(api_key),
            temperature,
        })
    }

    /// 互換エンドポイント向けのプロバイダを作成（認証は任意）
    ///
    /// api_key_envが指定されていればそのキーを検証して使う。
    /// 未指定ならAuthorizationヘッダを付けない（ローカルサーバ等）。
    pub fn compat(
        model: Option<String>,
        base_url: Option<String>,
        api_key_env: Option<String>,
        temperature: Option<f32>,
    ) -> Result<Self, Error> {
        let api_key = match api_key_env {
            Some(env_name) => Some(resolve_api_key(&env_name)?),
            None => None,
        };
        Ok(Self {
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: normalize_base_url(base_url),
            api_key,
            temperature,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn analysis_system_prompt(focus: AnalysisFocus) -> &'static str {
        match focus {
            AnalysisFocus::Breed => {
                "You are an expert livestock breed identification specialist. Analyze this image to identify cattle or buffalo breeds with detailed characteristics and confidence levels."
            }
            AnalysisFocus::Health => {
                "You are a veterinary expert. Analyze this livestock image for visible health indicators, body condition, and any signs of wellness or concerns."
            }
            AnalysisFocus::Condition => {
                "You are a livestock condition assessment expert. Evaluate the animal's body condition score, nutritional status, and overall physical appearance."
            }
        }
    }
}

fn normalize_base_url(base_url: Option<String>) -> String {
    base_url
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// 環境変数からAPIキーを解決する
///
/// 未設定・空・プレースホルダはすべてConfigurationエラー。
fn resolve_api_key(env_name: &str) -> Result<String, Error> {
    match env::var(env_name) {
        Ok(key) if !key.is_empty() && key != API_KEY_PLACEHOLDER => Ok(key),
        _ => Err(Error::configuration(format!(
            "OpenAI API key is not configured. Please set your {} environment variable to use AI-powered breed identification.",
            env_name
        ))),
    }
}

impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let mut builder = reqwest::blocking::Client::new()
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(request_json.to_string());

        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().map_err(|e| {
            Error::network(format!(
                "Network error. Please check your internet connection and try again. ({})",
                e
            ))
        })?;

        let status = response.status();
        let response_text = response.text().map_err(|e| {
            Error::network(format!(
                "Network error. Please check your internet connection and try again. ({})",
                e
            ))
        })?;

        if !status.is_success() {
            let vendor_msg = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()));
            return Err(Error::from_api_status(status.as_u16(), vendor_msg));
        }

        Ok(response_text)
    }

    fn make_identify_payload(&self, image: &TransportImage) -> Result<Value, Error> {
        let mut payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": IDENTIFY_SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": IDENTIFY_USER_PROMPT },
                        { "type": "image_url", "image_url": { "url": image.url() } }
                    ]
                }
            ],
            "response_format": breed_identification_response_format()
        });
        if let Some(t) = self.temperature {
            payload["temperature"] = json!(t);
        }
        Ok(payload)
    }

    fn make_analysis_payload(
        &self,
        image: &TransportImage,
        focus: AnalysisFocus,
    ) -> Result<Value, Error> {
        let mut payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": Self::analysis_system_prompt(focus) },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": format!("Please analyze this image with focus on: {}", focus.as_str()) },
                        { "type": "image_url", "image_url": { "url": image.url() } }
                    ]
                }
            ],
            "max_tokens": ANALYSIS_MAX_TOKENS
        });
        if let Some(t) = self.temperature {
            payload["temperature"] = json!(t);
        }
        Ok(payload)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        if let Some(err) = v.get("error") {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::processing(format!("API error: {}", msg)));
        }

        let text = v["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_without_key() -> OpenAiProvider {
        OpenAiProvider {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            temperature: None,
        }
    }

    #[test]
    fn test_new_without_key_is_configuration_error() {
        // 他テストと衝突しないようテスト専用の環境変数名を使う
        let e = OpenAiProvider::new(None, None, Some("BREEDID_TEST_NO_KEY".to_string()), None)
            .unwrap_err();
        assert_eq!(e.kind(), "configuration");
        assert!(e.to_string().contains("BREEDID_TEST_NO_KEY"));
    }

    #[test]
    fn test_new_with_placeholder_key_is_configuration_error() {
        env::set_var("BREEDID_TEST_PLACEHOLDER_KEY", API_KEY_PLACEHOLDER);
        let e = OpenAiProvider::new(
            None,
            None,
            Some("BREEDID_TEST_PLACEHOLDER_KEY".to_string()),
            None,
        )
        .unwrap_err();
        assert_eq!(e.kind(), "configuration");
        env::remove_var("BREEDID_TEST_PLACEHOLDER_KEY");
    }

    #[test]
    fn test_compat_without_key_env_skips_auth() {
        let p = OpenAiProvider::compat(
            Some("llava".to_string()),
            Some("http://localhost:11434/v1/".to_string()),
            None,
            Some(0.2),
        )
        .unwrap();
        assert!(p.api_key.is_none());
        assert_eq!(p.url(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_make_identify_payload_shape() {
        let p = provider_without_key();
        let image = TransportImage::from_image_ref(
            &crate::adapter::StdFileSystem,
            &crate::domain::ImageRef::RemoteUrl("https://example.com/cow.jpg".to_string()),
        )
        .unwrap();
        let payload = p.make_identify_payload(&image).unwrap();
        assert_eq!(payload["model"], "gpt-4o");
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"]
            .as_str()
            .unwrap()
            .contains("veterinary specialist"));
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(
            messages[1]["content"][1]["image_url"]["url"],
            "https://example.com/cow.jpg"
        );
        assert_eq!(payload["response_format"]["type"], "json_schema");
        // temperature未指定なら送らない
        assert!(payload.get("temperature").is_none());
    }

    #[test]
    fn test_identify_payload_is_identical_for_same_image() {
        // リトライは同一リクエスト: 同じ画像からのペイロードは完全一致
        let p = provider_without_key();
        let image = TransportImage::from_image_ref(
            &crate::adapter::StdFileSystem,
            &crate::domain::ImageRef::RemoteUrl("https://example.com/cow.jpg".to_string()),
        )
        .unwrap();
        let a = p.make_identify_payload(&image).unwrap();
        let b = p.make_identify_payload(&image).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_make_analysis_payload_shape() {
        let p = provider_without_key();
        let image = TransportImage::from_image_ref(
            &crate::adapter::StdFileSystem,
            &crate::domain::ImageRef::RemoteUrl("https://example.com/cow.jpg".to_string()),
        )
        .unwrap();
        let payload = p
            .make_analysis_payload(&image, AnalysisFocus::Health)
            .unwrap();
        assert_eq!(payload["max_tokens"], 1000);
        assert!(payload.get("response_format").is_none());
        let messages = payload["messages"].as_array().unwrap();
        assert!(messages[0]["content"]
            .as_str()
            .unwrap()
            .contains("veterinary expert"));
        assert!(messages[1]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("focus on: health"));
    }

    #[test]
    fn test_parse_response_text() {
        let p = provider_without_key();
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"{\"breedName\":\"Gir\"}"}}]}"#;
        let text = p.parse_response_text(json).unwrap();
        assert_eq!(text.as_deref(), Some("{\"breedName\":\"Gir\"}"));
    }

    #[test]
    fn test_parse_response_text_error_field() {
        let p = provider_without_key();
        let json = r#"{"error":{"message":"model overloaded"}}"#;
        let e = p.parse_response_text(json).unwrap_err();
        assert_eq!(e.kind(), "processing");
        assert!(e.to_string().contains("model overloaded"));
    }

    #[test]
    fn test_parse_response_text_empty_content() {
        let p = provider_without_key();
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let text = p.parse_response_text(json).unwrap();
        assert_eq!(text, None);
    }
}
