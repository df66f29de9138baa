//! 画像参照のトランスポート表現への変換
//!
//! ImageRef（LocalFile / RemoteUrl）からAPIに渡せるURL表現を1か所で作る。
//! ローカルファイルはbase64のdata URLにエンコードする。エンコード済みの
//! 値はTransportImageが所有し、呼び出しのスコープを抜ければ成功・失敗の
//! どちらの経路でも解放される。

use crate::domain::ImageRef;
use crate::error::Error;
use crate::ports::outbound::FileSystem;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// API呼び出しに渡す画像のトランスポート表現
///
/// data URL（ローカルファイル）またはリモートURLそのもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportImage {
    url: String,
}

impl TransportImage {
    /// ImageRefからトランスポート表現を作る
    ///
    /// LocalFileはファイルを読み、拡張子から推定したMIMEタイプで
    /// `data:<mime>;base64,...` を構築する。RemoteUrlはそのまま使う。
    pub fn from_image_ref(fs: &dyn FileSystem, image: &ImageRef) -> Result<Self, Error> {
        match image {
            ImageRef::LocalFile(path) => {
                let bytes = fs.read(path)?;
                let mime = mime_guess::from_path(path).first_or_octet_stream();
                let encoded = STANDARD.encode(&bytes);
                Ok(Self {
                    url: format!("data:{};base64,{}", mime.essence_str(), encoded),
                })
            }
            ImageRef::RemoteUrl(url) => Ok(Self { url: url.clone() }),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
