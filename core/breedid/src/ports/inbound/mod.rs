//! Inboundポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use crate::cli::Config;
use common::error::Error;

/// breedidアプリケーションを実行するInboundポート
///
/// main/cliはこのtraitを実装した型のrunを呼び出す。
pub trait UseCaseRunner: Send + Sync {
    fn run(&self, config: Config) -> Result<i32, Error>;
}
