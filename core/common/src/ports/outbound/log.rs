//! 構造化ログOutboundポート
//!
//! 全レイヤー（CLI / usecase / adapter）からJSONLログをファイルに出力するためのtrait。
//! エラー時のコンソール表示（stderr）とは別チャネルで、ファイルにのみ書き出す。

use crate::error::Error;
use serde::Serialize;
use std::collections::BTreeMap;

/// 現在時刻をISO8601 (RFC3339)で返す。LogRecordの`ts`に使う。
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

/// 1行分のログレコード（JSONLの1行に対応）
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// ISO8601形式のタイムスタンプ
    pub ts: String,
    pub level: LogLevel,
    pub message: String,
    /// 例: cli, usecase, adapter, wiring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// 例: lifecycle, history, provider, error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 追加のキー・値（オブジェクトとして出力）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, serde_json::Value>>,
}

/// 構造化ログを出力するOutboundポート
///
/// 実装はcommon::adapter::FileJsonLog（ファイルへJSONL追記）やNoopLog（テスト用）など。
pub trait Log: Send + Sync {
    /// 1レコードをログに書き出す（ファイルへJSONL 1行として追記）
    fn log(&self, record: &LogRecord) -> Result<(), Error>;
}
