//! ビジョンAPIクライアント
//!
//! 品種判定はすべて外部のマルチモーダルモデルに委譲する。
//! このモジュールはリクエスト構築・HTTP呼び出し・構造化レスポンスの
//! パースだけを受け持つ。

/// プロバイダのtrait定義
pub mod provider;

/// OpenAI Chat Completionsプロバイダ
pub mod openai;

/// モックプロバイダ（ネットワーク不要。デモ・テスト用）
pub mod mock;

/// 品種判定レスポンスのJSONスキーマ
pub mod schema;

/// 画像参照のトランスポート表現への変換
pub mod image;

/// プロバイダ非依存のドライバー
pub mod driver;

/// profiles.json用の設定型
pub mod config;

/// profiles.jsonの読み込みとプロバイダ解決
pub mod resolver;

/// プロバイダファクトリー
pub mod factory;

pub use driver::VisionDriver;
pub use factory::{create_driver, create_provider, AnyProvider, ProviderType};
pub use image::TransportImage;
pub use provider::VisionProvider;
pub use resolver::{load_profiles_config, resolve_provider, ResolvedProvider};
