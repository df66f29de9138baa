//! breedidのユースケース（アダプター経由でI/Oを行う）
//!
//! 1回の判定は validate → プロバイダ組み立て → API呼び出し →
//! id/timestamp付与 → 履歴記録 の直列の流れ。プロセスごとに
//! 同時に進む判定は1つだけで、履歴は読み直してから書く。

use crate::ports::outbound::ProviderFactory;
use crate::usecase::history::PredictionHistory;
use crate::usecase::validate::validate_upload;
use common::domain::{AnalysisFocus, ImageRef, ModelName, Prediction, ProviderName};
use common::error::Error;
use common::ports::outbound::{
    now_iso8601, Clock, EnvResolver, FileSystem, IdGenerator, Log, LogLevel, LogRecord,
};
use common::vision::{load_profiles_config, TransportImage, VisionDriver};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct AppDeps {
    pub fs: Arc<dyn FileSystem>,
    pub env_resolver: Arc<dyn EnvResolver>,
    pub clock: Arc<dyn Clock>,
    pub id_gen: Arc<dyn IdGenerator>,
    pub provider_factory: Arc<dyn ProviderFactory>,
    pub log: Arc<dyn Log>,
}

pub struct AppUseCase {
    deps: AppDeps,
}

impl AppUseCase {
    pub fn new(deps: AppDeps) -> Self {
        Self { deps }
    }

    /// 画像1枚を判定し、履歴の先頭に記録して返す
    ///
    /// ローカルファイルはサイズ・MIMEを先に検証し、弾かれた場合は
    /// プロバイダの組み立てにも進まない。APIキー未設定もプロバイダ
    /// 組み立て時点（ネットワーク前）でConfigurationとして返る。
    pub fn identify(
        &self,
        image_arg: &str,
        profile: Option<&ProviderName>,
        model: Option<&ModelName>,
    ) -> Result<Prediction, Error> {
        let image = ImageRef::parse(image_arg);
        if let Some(path) = image.local_path() {
            validate_upload(self.deps.fs.as_ref(), path)?;
        }

        let (profile_name, provider) = self.deps.provider_factory.create(profile, model)?;
        self.log_provider_selected("identify", &profile_name);

        // トランスポート表現はこの呼び出しの間だけ生きる
        let transport = TransportImage::from_image_ref(self.deps.fs.as_ref(), &image)?;
        let driver = VisionDriver::new(provider);
        let mut prediction = driver.identify(&transport)?;

        prediction.id = self.deps.id_gen.next_id();
        prediction.timestamp = self.deps.clock.now_ms();
        prediction.image_path = image.local_path().map(|p| p.to_path_buf());

        let mut history = self.load_history()?;
        history.record(prediction.clone())?;
        self.log_recorded(&prediction, history.len());

        Ok(prediction)
    }

    /// 画像の追加分析（自由記述）。履歴には記録しない
    pub fn analyze(
        &self,
        image_arg: &str,
        focus: AnalysisFocus,
        profile: Option<&ProviderName>,
        model: Option<&ModelName>,
    ) -> Result<String, Error> {
        let image = ImageRef::parse(image_arg);
        if let Some(path) = image.local_path() {
            validate_upload(self.deps.fs.as_ref(), path)?;
        }

        let (profile_name, provider) = self.deps.provider_factory.create(profile, model)?;
        self.log_provider_selected("analyze", &profile_name);

        let transport = TransportImage::from_image_ref(self.deps.fs.as_ref(), &image)?;
        let driver = VisionDriver::new(provider);
        driver.analyze(&transport, focus)
    }

    /// 履歴一覧（新しい順）
    pub fn history(&self) -> Result<Vec<Prediction>, Error> {
        Ok(self.load_history()?.entries().to_vec())
    }

    /// 保存済み予測をIDで取り出す
    pub fn select(&self, id: &str) -> Result<Prediction, Error> {
        let history = self.load_history()?;
        history.select(id).cloned().ok_or_else(|| {
            Error::invalid_argument(format!("No prediction with id '{}' in history.", id))
        })
    }

    /// 履歴の全削除
    pub fn clear_history(&self) -> Result<(), Error> {
        let mut history = self.load_history()?;
        history.clear()
    }

    /// 現在有効なプロファイル一覧を返す（ソート済み名前リストとデフォルトプロファイル名）。
    /// 表示はCLIの責務のため、usecaseはデータのみ返す。
    pub fn list_profiles(&self) -> Result<(Vec<String>, Option<String>), Error> {
        let cfg = load_profiles_config(
            self.deps.fs.as_ref(),
            self.deps.env_resolver.as_ref(),
        )?;
        let mut names: Vec<String> =
            common::vision::resolver::available_provider_names(cfg.as_ref());
        names.sort();
        let default = cfg
            .as_ref()
            .and_then(|c| c.default_provider.clone())
            .or_else(|| Some("openai".to_string()));
        Ok((names, default))
    }

    fn load_history(&self) -> Result<PredictionHistory, Error> {
        let path = self.deps.env_resolver.resolve_history_path()?;
        Ok(PredictionHistory::load(
            Arc::clone(&self.deps.fs),
            path,
            Some(self.deps.log.as_ref()),
        ))
    }

    fn log_provider_selected(&self, operation: &str, profile_name: &str) {
        let mut fields = BTreeMap::new();
        fields.insert("operation".to_string(), serde_json::json!(operation));
        fields.insert("profile".to_string(), serde_json::json!(profile_name));
        let _ = self.deps.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "provider selected".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("provider".to_string()),
            fields: Some(fields),
        });
    }

    fn log_recorded(&self, prediction: &Prediction, history_len: usize) {
        let mut fields = BTreeMap::new();
        fields.insert(
            "prediction_id".to_string(),
            serde_json::json!(prediction.id.as_ref()),
        );
        fields.insert(
            "breed".to_string(),
            serde_json::json!(prediction.breed_name),
        );
        fields.insert(
            "confidence".to_string(),
            serde_json::json!(prediction.confidence),
        );
        fields.insert("history_len".to_string(), serde_json::json!(history_len));
        let _ = self.deps.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "prediction recorded".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("history".to_string()),
            fields: Some(fields),
        });
    }
}
