//! アプリ全体を通すテスト（モックプロバイダ + 一時ホームディレクトリ）
