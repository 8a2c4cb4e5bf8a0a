use crate::domain::blob_source::path_error::PathError;
use crate::domain::page::html_page::PageError;
use crate::domain::pipeline::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("パス関連のエラー")]
    Path(#[from] PathError),

    #[error("ページの読み込みに失敗しました")]
    Page(#[from] PageError),

    #[error("PDF変換エラー")]
    Pipeline(#[from] PipelineError),
}
