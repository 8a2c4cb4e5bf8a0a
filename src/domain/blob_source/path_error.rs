use std::fmt;

// ブロブ保存先のパスに関するエラー型を定義
#[derive(Debug)]
pub enum PathError {
    InvalidPath(String),
    IoError(std::io::Error),
    /// ディレクトリでもZIPファイルでもないパスが渡された場合。
    UnsupportedType(String),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidPath(s) => write!(f, "無効なパスです: {}", s),
            PathError::IoError(e) => write!(f, "I/Oエラー: {}", e),
            PathError::UnsupportedType(s) => {
                write!(f, "ディレクトリまたは.zipファイルを指定してください: {}", s)
            }
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PathError::IoError(e) => Some(e),
            _ => None,
        }
    }
}
