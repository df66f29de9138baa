//! 配線: 標準アダプタでUseCaseを組み立てる

use std::sync::Arc;

use common::adapter::{
    FileJsonLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem, StdIdGenerator,
};
use common::ports::outbound::{Clock, EnvResolver, FileSystem, IdGenerator, Log};

use crate::adapter::StdProviderFactory;
use crate::ports::outbound::ProviderFactory;
use crate::usecase::app::{AppDeps, AppUseCase};

/// 組み立て済みアプリケーション
pub struct App {
    pub logger: Arc<dyn Log>,
    pub use_case: AppUseCase,
}

/// 配線: 標準アダプタでAppUseCaseを組み立てる
///
/// ログはホームディレクトリ配下のJSONLへ。ホームが解決できない環境では
/// NoopLogで進める（ログ不能はアプリの失敗にしない）。
pub fn wire_breedid() -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let id_gen: Arc<dyn IdGenerator> = Arc::new(StdIdGenerator::new(Arc::clone(&clock)));

    let logger: Arc<dyn Log> = match env_resolver.resolve_home_dir() {
        Ok(home) => Arc::new(FileJsonLog::new(
            Arc::clone(&fs),
            home.join("logs").join("breedid.jsonl"),
        )),
        Err(_) => Arc::new(NoopLog),
    };

    let provider_factory: Arc<dyn ProviderFactory> = Arc::new(StdProviderFactory::new(
        Arc::clone(&fs),
        Arc::clone(&env_resolver),
    ));

    let use_case = AppUseCase::new(AppDeps {
        fs,
        env_resolver,
        clock,
        id_gen,
        provider_factory,
        log: Arc::clone(&logger),
    });

    App { logger, use_case }
}
