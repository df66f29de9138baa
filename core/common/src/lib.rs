//! breedid共通ライブラリ
//!
//! `breedid` CLIから使う機能を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtypeと予測レコード）
pub mod domain;

/// Outboundポート定義
pub mod ports;

/// 標準アダプター実装
pub mod adapter;

/// ビジョンAPIクライアント（プロバイダとドライバー）
pub mod vision;
