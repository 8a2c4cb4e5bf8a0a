use super::blob_source::has_image_extension;
use super::path_error::PathError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// ブロブを書き出したディレクトリを表す構造体
#[derive(Debug)]
pub struct DirectoryPath {
    pub path: PathBuf,
    // 画像ファイルの stem → パス
    index: HashMap<String, PathBuf>,
}

impl DirectoryPath {
    // コンストラクタ: パスを受け取り、バリデーションを行う
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let path = path.as_ref();

        // パスが存在し、かつディレクトリであることを検証
        if !path.exists() {
            return Err(PathError::InvalidPath(format!(
                "パス '{}' は存在しません。",
                path.display()
            )));
        }
        if !path.is_dir() {
            return Err(PathError::InvalidPath(format!(
                "パス '{}' はディレクトリではありません。",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            index: index_images(path)?,
        })
    }

    // 内部のPathBufへの参照を返す
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// ファイル名の stem が `key` と一致する画像ファイルを返す。
    ///
    /// 索引は `new` の時点で作るので、その後に追加されたファイルは対象外。
    pub fn find_image(&self, key: &str) -> Option<&Path> {
        self.index.get(key).map(PathBuf::as_path)
    }

    /// `key` に対応する画像のバイト列を読み込む。見つからなければ `None`。
    pub fn read_image(&self, key: &str) -> Result<Option<Vec<u8>>, PathError> {
        match self.find_image(key) {
            Some(path) => fs::read(path).map(Some).map_err(PathError::IoError),
            None => Ok(None),
        }
    }
}

/// サブディレクトリも含めて画像ファイルを走査し、stem ごとの索引を作る。
///
/// 走査順はファイル名順に固定するため、同名の候補が複数あれば最初のものが選ばれる。
fn index_images(root: &Path) -> Result<HashMap<String, PathBuf>, PathError> {
    let mut index = HashMap::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            PathError::IoError(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("ディレクトリの走査に失敗しました")),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !has_image_extension(path) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            index
                .entry(stem.to_string())
                .or_insert_with(|| path.to_path_buf());
        }
    }
    tracing::debug!("{} 件の画像を索引しました: {}", index.len(), root.display());
    Ok(index)
}
