//! 予測履歴の有界キャッシュ
//!
//! 直近10件を新しい順に保持し、history.jsonへ全量を書き戻す。
//! 読み込みはベストエフォート: ファイルが無い・壊れている場合は黙って
//! 空で初期化する（キャッシュなのでエラーにはしない）。
//! 書き込みは一時ファイル + renameのアトミック置換。複数プロセスが
//! 同時に書いた場合はlast-write-wins。

use common::domain::Prediction;
use common::error::Error;
use common::ports::outbound::fs::write_atomic;
use common::ports::outbound::{now_iso8601, FileSystem, Log, LogLevel, LogRecord};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// 履歴の上限件数。超えた分は古い方から捨てる
pub const HISTORY_CAPACITY: usize = 10;

/// 予測履歴ストア（新しい順・最大10件・都度永続化）
pub struct PredictionHistory {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    entries: Vec<Prediction>,
}

impl PredictionHistory {
    /// 永続化された履歴を読み込む
    ///
    /// ファイルが無い・読めない・JSONが壊れている場合はどれも空で始める。
    /// 壊れたデータの破棄はエラーとして呼び出し元に返さない（logには残す）。
    pub fn load(fs: Arc<dyn FileSystem>, path: PathBuf, log: Option<&dyn Log>) -> Self {
        let entries = match fs.read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<Prediction>>(&contents) {
                Ok(mut list) => {
                    list.truncate(HISTORY_CAPACITY);
                    list
                }
                Err(e) => {
                    if let Some(logger) = log {
                        let mut fields = BTreeMap::new();
                        fields.insert(
                            "path".to_string(),
                            serde_json::json!(path.display().to_string()),
                        );
                        fields.insert("error".to_string(), serde_json::json!(e.to_string()));
                        let _ = logger.log(&LogRecord {
                            ts: now_iso8601(),
                            level: LogLevel::Warn,
                            message: "discarding malformed history".to_string(),
                            layer: Some("usecase".to_string()),
                            kind: Some("history".to_string()),
                            fields: Some(fields),
                        });
                    }
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { fs, path, entries }
    }

    pub fn entries(&self) -> &[Prediction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 新しい予測を先頭に積み、上限まで切り詰めて全量を書き戻す
    ///
    /// # Errors
    /// 永続化に失敗した場合はIo。メモリ上のリストは更新済みのまま残る
    /// （書き戻しはアトミック置換なのでファイル側も壊れない）。
    pub fn record(&mut self, prediction: Prediction) -> Result<(), Error> {
        self.entries.insert(0, prediction);
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist()
    }

    /// 履歴を空にし、永続化ファイルを削除する
    pub fn clear(&mut self) -> Result<(), Error> {
        self.entries.clear();
        if self.fs.exists(&self.path) {
            self.fs.remove_file(&self.path)?;
        }
        Ok(())
    }

    /// IDによる参照。並びも内容も変更しない
    pub fn select(&self, id: &str) -> Option<&Prediction> {
        self.entries.iter().find(|p| p.id.as_ref() == id)
    }

    fn persist(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| Error::json(e.to_string()))?;
        write_atomic(self.fs.as_ref(), &self.path, &json)
    }
}
