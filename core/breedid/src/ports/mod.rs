//! Ports & Adaptersのポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（プロバイダ組み立て）を使うためのtrait

pub mod inbound;
pub mod outbound;
