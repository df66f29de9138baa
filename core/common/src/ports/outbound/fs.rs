//! ファイルシステムOutboundポート
//!
//! usecaseはこのtrait経由でのみファイルI/Oを行う。

use crate::error::Error;
use std::path::{Path, PathBuf};

/// ファイルメタデータ（存在・サイズ・種別）
#[derive(Debug, Clone)]
pub struct FileMetadata {
    len: u64,
    is_file: bool,
    is_dir: bool,
}

impl FileMetadata {
    pub fn new(len: u64, is_file: bool, is_dir: bool) -> Self {
        Self {
            len,
            is_file,
            is_dir,
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// ファイルシステム抽象（Outboundポート）
///
/// 実装は`common::adapter::StdFileSystem`やテスト用のメモリFSなど。
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    /// バイナリ読み込み（画像のbase64化に使う）
    fn read(&self, path: &Path) -> Result<Vec<u8>, Error>;
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;
    fn rename(&self, from: &Path, to: &Path) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error>;
    fn remove_file(&self, path: &Path) -> Result<(), Error>;
    /// 追記用に開く（存在しなければ作成）。返したWriterをdropすると閉じる
    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error>;

    /// パスが存在するか（metadataが取れればtrue）
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}

/// `write` + `rename` によるアトミックな全置換
///
/// 一時ファイルに書いてからrenameするので、途中失敗しても既存の内容は壊れない。
pub fn write_atomic(fs: &dyn FileSystem, path: &Path, contents: &str) -> Result<(), Error> {
    let tmp: PathBuf = {
        let mut os = path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    };
    fs.write(&tmp, contents)?;
    fs.rename(&tmp, path)
}
