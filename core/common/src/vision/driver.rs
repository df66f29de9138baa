//! ビジョンドライバーの実装
//!
//! プロバイダに依存しない共通処理を提供します。
//! ペイロード生成 → HTTP実行 → テキスト抽出 → 構造化パースの流れを束ねる。

use crate::domain::{AnalysisFocus, Prediction};
use crate::error::Error;
use crate::vision::image::TransportImage;
use crate::vision::provider::VisionProvider;

/// ビジョンドライバー
pub struct VisionDriver<P: VisionProvider> {
    provider: P,
}

impl<P: VisionProvider> VisionDriver<P> {
    /// 新しいドライバーを作成
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// 画像から構造化された品種予測を取得
    ///
    /// 返るPredictionのid / timestampは空のまま。呼び出し側が生成して埋める。
    ///
    /// # Errors
    /// HTTP層のエラーはプロバイダの種別（Auth / RateLimit / BadRequest / Network）を
    /// そのまま伝播する。スキーマに合わないレスポンスはProcessing。
    pub fn identify(&self, image: &TransportImage) -> Result<Prediction, Error> {
        let payload = self.provider.make_identify_payload(image)?;
        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let response_json = self.provider.make_http_request(&request_json)?;

        let content = self
            .provider
            .parse_response_text(&response_json)?
            .ok_or_else(|| {
                Error::processing(
                    "Failed to identify breed. Please try again with a clearer image.",
                )
            })?;

        let prediction: Prediction = serde_json::from_str(&content).map_err(|e| {
            Error::processing(format!("Unexpected identification response: {}", e))
        })?;
        if prediction.breed_name.trim().is_empty() {
            return Err(Error::processing(
                "Failed to identify breed. Please try again with a clearer image.",
            ));
        }
        Ok(prediction)
    }

    /// 画像の追加分析（自由記述）を取得
    pub fn analyze(&self, image: &TransportImage, focus: AnalysisFocus) -> Result<String, Error> {
        let payload = self.provider.make_analysis_payload(image, focus)?;
        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;

        let response_json = self.provider.make_http_request(&request_json)?;

        self.provider
            .parse_response_text(&response_json)?
            .ok_or_else(|| Error::processing("No analysis text in response"))
    }

    /// プロバイダを取得
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
