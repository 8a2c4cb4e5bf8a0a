use super::blob_source::has_image_extension;
use super::path_error::PathError;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// ブロブ画像をまとめたZIPファイルへのパスを表現し、その妥当性を保証する構造体。
#[derive(Debug)]
pub struct ZipFilePath(PathBuf);

impl ZipFilePath {
    // --- Public Methods ---

    /// 新しい `ZipFilePath` インスタンスを生成する。
    ///
    /// パスが存在し、ファイルであり、かつ拡張子が `.zip` であることを検証する。
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PathError::InvalidPath(format!(
                "パス '{}' は存在しません。",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(PathError::InvalidPath(format!(
                "パス '{}' はファイルではありません。",
                path.display()
            )));
        }
        if !is_zip(path) {
            return Err(PathError::InvalidPath(format!(
                "パス '{}' は.zipファイルではありません。",
                path.display()
            )));
        }
        Ok(Self(path.to_path_buf()))
    }

    /// 内部の `Path` への参照を返す。
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// ファイル名の stem が `key` と一致する画像エントリを読み込む。見つからなければ `None`。
    pub fn read_image(&self, key: &str) -> Result<Option<Vec<u8>>, PathError> {
        let mut archive = self.open_archive()?;

        // エントリ名をソートして、同名候補がある場合の選択を安定させる
        let mut candidates: Vec<String> = archive
            .file_names()
            .filter(|name| {
                let path = Path::new(name);
                has_image_extension(path) && path.file_stem().and_then(|s| s.to_str()) == Some(key)
            })
            .map(|name| name.to_string())
            .collect();
        candidates.sort();

        match candidates.first() {
            Some(name) => {
                let mut entry = Self::find_entry_in_archive(&mut archive, name)?;
                Self::read_entry_content(&mut entry).map(Some)
            }
            None => Ok(None),
        }
    }

    // --- Private Helper Methods ---

    /// ZIPファイルを開き、ZipArchiveを生成する。
    fn open_archive(&self) -> Result<ZipArchive<std::fs::File>, PathError> {
        let file = std::fs::File::open(&self.0)
            .map_err(|e| PathError::InvalidPath(format!("ZIPファイルを開けません: {}", e)))?;
        ZipArchive::new(file)
            .map_err(|e| PathError::InvalidPath(format!("無効なZIPファイル: {}", e)))
    }

    /// アーカイブから指定されたエントリを見つける。
    fn find_entry_in_archive<'a>(
        archive: &'a mut ZipArchive<std::fs::File>,
        name: &str,
    ) -> Result<zip::read::ZipFile<'a>, PathError> {
        archive
            .by_name(name)
            .map_err(|e| PathError::InvalidPath(format!("エントリ '{}' を開けません: {}", name, e)))
    }

    /// エントリの内容を読み込む。
    fn read_entry_content(entry: &mut zip::read::ZipFile) -> Result<Vec<u8>, PathError> {
        let mut buffer = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buffer)
            .map_err(|e| PathError::InvalidPath(format!("エントリの読み取りに失敗: {}", e)))?;
        Ok(buffer)
    }
}

/// 拡張子が `.zip` (大文字小文字を問わない) かどうか。
pub(crate) fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    // 一時ZIPファイルを作成してパスを返す。entries は (name, bytes) のタプル配列。
    fn create_temp_zip(dir: &TempDir, entries: &[(&str, &[u8])]) -> PathBuf {
        let path = dir.path().join("blobs.zip");
        let file = File::create(&path).expect("failed to create temp zip file");
        let mut zip = zip::ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        for (name, bytes) in entries {
            zip.start_file(*name, options).expect("start_file failed");
            zip.write_all(bytes).expect("write_all failed");
        }
        zip.finish().expect("finish zip failed");
        path
    }

    #[test]
    fn test_read_image_matches_stem_in_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = create_temp_zip(
            &dir,
            &[("notes.txt", b"skip"), ("pages/abc-123.png", b"png bytes")],
        );
        let zfp = ZipFilePath::new(&zip_path).expect("ZipFilePath::new should succeed");

        let content = zfp.read_image("abc-123").expect("read_image should succeed");
        assert_eq!(content, Some(b"png bytes".to_vec()));
    }

    #[test]
    fn test_read_image_missing_key_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = create_temp_zip(&dir, &[("abc-123.txt", b"not an image")]);
        let zfp = ZipFilePath::new(&zip_path).unwrap();

        assert_eq!(zfp.read_image("abc-123").unwrap(), None);
    }

    #[test]
    fn test_new_invalid_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_zip.txt");
        File::create(&path).expect("create file");

        match ZipFilePath::new(&path) {
            Err(PathError::InvalidPath(msg)) => assert!(msg.contains("は.zipファイルではありません。")),
            other => panic!("Expected InvalidPath error for wrong extension: {:?}", other),
        }
    }

    #[test]
    fn test_new_nonexistent() {
        match ZipFilePath::new("nonexistent_blobs_for_test.zip") {
            Err(PathError::InvalidPath(msg)) => assert!(msg.contains("は存在しません。")),
            other => panic!("Expected InvalidPath error for nonexistent file: {:?}", other),
        }
    }

    #[test]
    fn test_broken_archive_reports_invalid_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ZIP");
        std::fs::write(&path, b"definitely not a zip").unwrap();
        let zfp = ZipFilePath::new(&path).expect("extension check is case-insensitive");

        match zfp.read_image("abc") {
            Err(PathError::InvalidPath(msg)) => assert!(msg.contains("無効なZIPファイル")),
            other => panic!("Expected InvalidPath error for broken archive: {:?}", other),
        }
    }
}
