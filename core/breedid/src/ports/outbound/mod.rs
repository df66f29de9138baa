//! Outboundポート: アプリが外界を使うためのtrait

pub mod provider_factory;

pub use provider_factory::ProviderFactory;
