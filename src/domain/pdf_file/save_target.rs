use super::create_pdf::PdfValidationError;
use std::fs;
use std::path::{Path, PathBuf};

/// 完成したPDFの受け取り先。ブラウザのダウンロードに相当する。
pub trait SaveTarget {
    /// 保存先の場所を返す。
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, PdfValidationError>;
}

/// 指定ディレクトリにファイルとして書き出す保存先。
#[derive(Debug)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, PdfValidationError> {
        // 出力先フォルダは保存する直前に作る
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                PdfValidationError::PdfSaveError(format!("{}: {}", self.dir.display(), e))
            })?;
        }
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).map_err(|e| {
            PdfValidationError::PdfSaveError(format!("{}: {}", path.display(), e))
        })?;
        Ok(path)
    }
}
