use super::directory_path::DirectoryPath;
use super::path_error::PathError;
use super::zip_file_path::{is_zip, ZipFilePath};
use std::collections::HashMap;
use std::path::Path;

/// 対応している画像拡張子。
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// `<img src>` の URL から画像バイト列を取り出すための抽象。
///
/// ブラウザがブロブURLをメモリ上の画像に解決する役割を、ページ読み込み時に肩代わりする。
pub trait BlobResolver {
    /// 見つからない場合は `Ok(None)` を返す (壊れた画像として扱われる)。
    fn resolve(&self, src: &str) -> Result<Option<Vec<u8>>, PathError>;
}

/// 書き出し済みのブロブ画像の保存先。
/// ディレクトリパスまたはZIPファイルパスのいずれかを保持する。
#[derive(Debug)]
pub enum BlobSource {
    Directory(DirectoryPath),
    ZipFile(ZipFilePath),
}

impl BlobSource {
    /// パスの種類 (ディレクトリ / .zip) を判定して `BlobSource` を生成する。
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let path = path.as_ref();
        if path.is_dir() {
            Ok(BlobSource::Directory(DirectoryPath::new(path)?))
        } else if path.is_file() && is_zip(path) {
            Ok(BlobSource::ZipFile(ZipFilePath::new(path)?))
        } else if !path.exists() {
            Err(PathError::InvalidPath(format!(
                "パス '{}' は存在しません。",
                path.display()
            )))
        } else {
            Err(PathError::UnsupportedType(path.display().to_string()))
        }
    }

    pub fn as_path(&self) -> &Path {
        match self {
            BlobSource::Directory(dir) => dir.as_path(),
            BlobSource::ZipFile(zip) => zip.as_path(),
        }
    }
}

impl BlobResolver for BlobSource {
    fn resolve(&self, src: &str) -> Result<Option<Vec<u8>>, PathError> {
        let Some(key) = blob_key(src) else {
            return Ok(None);
        };
        match self {
            BlobSource::Directory(dir) => dir.read_image(key),
            BlobSource::ZipFile(zip) => zip.read_image(key),
        }
    }
}

/// src をキーにしたメモリ上の対応表。埋め込み用途やテストで使う。
impl BlobResolver for HashMap<String, Vec<u8>> {
    fn resolve(&self, src: &str) -> Result<Option<Vec<u8>>, PathError> {
        Ok(self.get(src).cloned())
    }
}

/// ブロブURLの最後のパス要素 (UUID) を取り出す。
///
/// `blob:https://drive.google.com/1f0c...` → `1f0c...`。クエリとフラグメントは無視する。
pub fn blob_key(src: &str) -> Option<&str> {
    let without_fragment = src.split('#').next().unwrap_or(src);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    without_query
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
}

/// パスがサポートされている画像ファイルであるか、拡張子で簡易的に判定します。
pub(crate) fn has_image_extension(path: &Path) -> bool {
    // `file_stem` がないとドットファイル (`.DS_Store` など) を誤判定するためチェック
    if path.file_stem().is_none() {
        return false;
    }
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}
