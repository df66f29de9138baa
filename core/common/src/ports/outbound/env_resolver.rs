//! 環境変数解決Outboundポート
//!
//! ホームディレクトリ・設定ファイルパスを環境変数から解決する。
//! usecaseはこのtrait経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outboundポート）
///
/// 実装は`common::adapter::StdEnvResolver`やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. BREEDID_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/breedid（XDG_CONFIG_HOMEが設定されていれば）
    /// 3. $HOME/.config/breedid
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// プロバイダプロファイル設定ファイルのパス（ホーム直下のprofiles.json）
    fn resolve_profiles_config_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("profiles.json"))
    }

    /// 履歴ファイルのパス（ホーム直下のhistory.json）
    fn resolve_history_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("history.json"))
    }
}
