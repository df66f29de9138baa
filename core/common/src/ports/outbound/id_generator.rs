//! 予測ID生成Outboundポート
//!
//! usecaseはIdGeneratorを注入し、テストでは固定IDを返す実装を渡せる。

use crate::domain::PredictionId;

/// PredictionIdを生成する抽象（Outboundポート）
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> PredictionId;
}
