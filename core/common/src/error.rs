//! エラーハンドリング
//!
//! ユーザー向けメッセージと機械可読な種別（kind）を1つのエラー型に統一する。
//! 終了コードはsysexits準拠。

use thiserror::Error;

/// エラー型
///
/// ビジョンAPI呼び出しに関わる種別（Upload〜Processing）と、
/// I/O・設定ファイル等の周辺種別を1つのenumで扱う。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// アップロード検証エラー（サイズ超過・非画像）。ネットワークに到達する前に検出される
    #[error("{0}")]
    Upload(String),

    /// APIキー未設定・プレースホルダのまま等の設定エラー。ネットワークに到達する前に検出される
    #[error("{0}")]
    Configuration(String),

    /// ベンダーにAPIキーを拒否された（HTTP 401）
    #[error("{0}")]
    Auth(String),

    /// ベンダーのレート制限（HTTP 429）
    #[error("{0}")]
    RateLimit(String),

    /// リクエスト不正（HTTP 400。画像が大きすぎる・未対応形式など）
    #[error("{0}")]
    BadRequest(String),

    /// トランスポート障害
    #[error("{0}")]
    Network(String),

    /// その他の処理エラー（スキーマ違反レスポンス・パース不能等）
    #[error("{0}")]
    Processing(String),

    /// I/Oエラー
    #[error("{0}")]
    Io(String),

    /// JSONパースエラー
    #[error("{0}")]
    Json(String),

    /// 引数不正（usage表示の対象）
    #[error("{0}")]
    InvalidArgument(String),

    /// 環境変数エラー
    #[error("{0}")]
    Env(String),
}

impl Error {
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn rate_limit(msg: impl Into<String>) -> Self {
        Self::RateLimit(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// HTTPステータスとベンダーメッセージからエラー種別を決める
    ///
    /// 401 → Auth、429 → RateLimit、400 → BadRequest。
    /// それ以外はメッセージに "network" を含めばNetwork、含まなければProcessing
    /// （ベンダーメッセージがあればそのまま載せる）。
    pub fn from_api_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Auth(
                "OpenAI API key is invalid. Please check your configuration.".to_string(),
            ),
            429 => Self::RateLimit(
                "OpenAI API rate limit exceeded. Please try again later.".to_string(),
            ),
            400 => Self::BadRequest(
                "Invalid request to OpenAI API. The image may be too large or in an unsupported format."
                    .to_string(),
            ),
            _ => match message {
                Some(m) if m.to_lowercase().contains("network") => Self::Network(
                    "Network error. Please check your internet connection and try again."
                        .to_string(),
                ),
                Some(m) => Self::Processing(m),
                None => Self::Processing(
                    "Failed to identify breed. Please try again with a clearer image.".to_string(),
                ),
            },
        }
    }

    /// 機械可読な種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upload(_) => "upload",
            Self::Configuration(_) => "configuration",
            Self::Auth(_) => "auth",
            Self::RateLimit(_) => "rate_limit",
            Self::BadRequest(_) => "bad_request",
            Self::Network(_) => "network",
            Self::Processing(_) => "processing",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::InvalidArgument(_) => "usage",
            Self::Env(_) => "env",
        }
    }

    /// usage表示の対象か
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセス終了コード（sysexits準拠）
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Upload(_) | Self::BadRequest(_) => 65,
            Self::InvalidArgument(_) => 64,
            Self::Network(_) => 69,
            Self::Processing(_) => 70,
            Self::Io(_) | Self::Json(_) => 74,
            Self::Auth(_) => 77,
            Self::Configuration(_) | Self::Env(_) => 78,
            Self::RateLimit(_) => 75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_status_401() {
        let e = Error::from_api_status(401, Some("Incorrect API key provided".to_string()));
        assert_eq!(e.kind(), "auth");
        assert!(e.to_string().contains("API key is invalid"));
        assert_eq!(e.exit_code(), 77);
    }

    #[test]
    fn test_from_api_status_429() {
        let e = Error::from_api_status(429, None);
        assert_eq!(e.kind(), "rate_limit");
        assert!(e.to_string().contains("rate limit"));
    }

    #[test]
    fn test_from_api_status_400() {
        let e = Error::from_api_status(400, Some("image too large".to_string()));
        assert_eq!(e.kind(), "bad_request");
        assert!(e.to_string().contains("unsupported format"));
    }

    #[test]
    fn test_from_api_status_network_message() {
        let e = Error::from_api_status(502, Some("upstream network unreachable".to_string()));
        assert_eq!(e.kind(), "network");
        assert!(e.to_string().contains("internet connection"));
    }

    #[test]
    fn test_from_api_status_other_carries_vendor_message() {
        let e = Error::from_api_status(500, Some("model overloaded".to_string()));
        assert_eq!(e.kind(), "processing");
        assert_eq!(e.to_string(), "model overloaded");
    }

    #[test]
    fn test_from_api_status_other_without_message() {
        let e = Error::from_api_status(503, None);
        assert_eq!(e.kind(), "processing");
        assert!(e.to_string().contains("clearer image"));
    }

    #[test]
    fn test_is_usage() {
        assert!(Error::invalid_argument("bad flag").is_usage());
        assert!(!Error::upload("too big").is_usage());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::invalid_argument("x").exit_code(), 64);
        assert_eq!(Error::upload("x").exit_code(), 65);
        assert_eq!(Error::network("x").exit_code(), 69);
        assert_eq!(Error::io_msg("x").exit_code(), 74);
        assert_eq!(Error::configuration("x").exit_code(), 78);
    }
}
