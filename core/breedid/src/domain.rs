//! breedid CLIのドメイン型

use common::domain::{ModelName, ProviderName};

/// CLIが実行するコマンド
///
/// 引数解析の結果（Config）をこの型に正規化してからディスパッチする。
#[derive(Debug, Clone, PartialEq)]
pub enum BreedidCommand {
    Help,
    ListProfiles,
    /// 履歴一覧の表示
    History,
    /// 履歴の全削除
    ClearHistory,
    /// 保存済み予測の再表示（並び替え・追い出しは起きない）
    Show { id: String },
    /// 構造化された品種判定
    Identify {
        image: Option<String>,
        profile: Option<ProviderName>,
        model: Option<ModelName>,
    },
    /// 自由記述の追加分析（breed / health / condition）
    Analyze {
        image: Option<String>,
        focus: String,
        profile: Option<ProviderName>,
        model: Option<ModelName>,
    },
}
