//! Ports & Adaptersのポート定義
//!
//! - outbound: ライブラリ利用側が外界（FS・時刻・環境変数・ログ等）を使うためのtrait

pub mod outbound;
