//! プロバイダ組み立てOutboundポート
//!
//! usecaseはこのtrait経由でビジョンプロバイダを得る。テストでは
//! モックプロバイダだけを返す実装を渡せる。

use common::domain::{ModelName, ProviderName};
use common::error::Error;
use common::vision::AnyProvider;

/// プロファイル・モデル指定からプロバイダを組み立てる抽象（Outboundポート）
///
/// APIキーの検証は組み立て時点で行われるため、設定エラーは
/// ネットワークに触れる前にここから返る。
pub trait ProviderFactory: Send + Sync {
    /// # Returns
    /// `(解決に使ったプロファイル名, プロバイダ)`
    fn create(
        &self,
        profile: Option<&ProviderName>,
        model: Option<&ModelName>,
    ) -> Result<(String, AnyProvider), Error>;
}
