//! アップロード検証
//!
//! サイズとMIMEタイプの純粋なチェック。ここで弾かれた画像は
//! 外部APIに一切到達しない。

use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::Path;

/// 受け付ける画像の上限サイズ（10 MiB）
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// ローカル画像ファイルを検証する
///
/// # Errors
/// * 読めない・ファイルでない場合はUpload
/// * 10 MiB超はUpload
/// * 拡張子から推定したMIMEタイプがimage/*でない場合はUpload
pub fn validate_upload(fs: &dyn FileSystem, path: &Path) -> Result<(), Error> {
    let meta = fs
        .metadata(path)
        .map_err(|_| Error::upload(format!("Cannot read image file '{}'.", path.display())))?;
    if !meta.is_file() {
        return Err(Error::upload(format!(
            "'{}' is not a regular file.",
            path.display()
        )));
    }
    if meta.len() > MAX_UPLOAD_BYTES {
        return Err(Error::upload(
            "File size too large. Please choose an image smaller than 10MB.",
        ));
    }
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(Error::upload(
            "Please select a valid image file (JPG, PNG, WEBP).",
        ));
    }
    Ok(())
}
