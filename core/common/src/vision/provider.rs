//! ビジョンプロバイダのtrait定義

use crate::domain::AnalysisFocus;
use crate::error::Error;
use crate::vision::image::TransportImage;
use serde_json::Value;

/// ビジョンプロバイダのtrait
///
/// 各プロバイダ（OpenAI、モックなど）はこのtraitを実装する必要があります。
/// ペイロード構築・HTTP実行・テキスト抽出を分離しておくことで、
/// ドライバー側の流れをプロバイダ非依存に保つ。
pub trait VisionProvider {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// HTTPリクエストを実行してレスポンスを取得
    ///
    /// # Arguments
    /// * `request_json` - リクエストJSON文字列
    ///
    /// # Returns
    /// * `Ok(String)` - レスポンスJSON文字列
    /// * `Err(Error)` - 種別付きエラー（401→Auth、429→RateLimit、400→BadRequest等）
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// 品種判定リクエストのペイロードを生成
    ///
    /// 同じ画像で再構築したペイロードは完全に一致する（リトライは同一リクエスト）。
    fn make_identify_payload(&self, image: &TransportImage) -> Result<Value, Error>;

    /// 追加分析（自由記述）リクエストのペイロードを生成
    ///
    /// スキーマ制約なし・出力トークン上限つき。フォーカスごとにシステム指示が変わる。
    fn make_analysis_payload(
        &self,
        image: &TransportImage,
        focus: AnalysisFocus,
    ) -> Result<Value, Error>;

    /// レスポンスからテキストを抽出
    ///
    /// # Returns
    /// * `Ok(Option<String>)` - 抽出したテキスト（存在しない場合はNone）
    /// * `Err(Error)` - パース不能・ベンダーエラー
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;
}
