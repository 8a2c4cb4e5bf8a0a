//! ページ上の Drive ブロブ画像から PDF を作る一連の処理。
//!
//! レンダラー読み込み → 画像の選別 → 文書の組み立て → 保存 を順に実行し、
//! どこかで失敗した時点で打ち切る (途中までの成果は保存しない)。

use crate::domain::image_data_list::{ImageDataList, ImageValidationError};
use crate::domain::image_selector::select_blob_images;
use crate::domain::loader::library_loader::{load_library, LibraryLoader, LoadError, RENDERER_URL};
use crate::domain::loader::trusted_types::TrustedTypePolicy;
use crate::domain::page::document_provider::DocumentProvider;
use crate::domain::pdf_file::create_pdf::{PdfFile, PdfValidationError};
use crate::domain::pdf_file::file_name::TITLE_ITEMPROP;
use crate::domain::pdf_file::page_format::PageFormat;
use crate::domain::pdf_file::save_target::SaveTarget;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    LoadingLibrary,
    SelectingImages,
    BuildingDocument,
    Saving,
    Done,
    Failed,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// PDFを保存した。
    Saved {
        path: PathBuf,
        file_name: String,
        pages: Vec<PageFormat>,
    },
    /// 対象の画像がなかったので何もしなかった。
    NoImages,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("レンダラーの読み込みに失敗しました")]
    Load(#[from] LoadError),

    #[error("PDFを作成できませんでした")]
    Pdf(#[from] PdfValidationError),
}

pub struct Pipeline<'a> {
    loader: &'a dyn LibraryLoader,
    target: &'a dyn SaveTarget,
    policy: TrustedTypePolicy,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    pub fn new(loader: &'a dyn LibraryLoader, target: &'a dyn SaveTarget) -> Self {
        Self {
            loader,
            target,
            policy: TrustedTypePolicy::default(),
            stage: Stage::Idle,
        }
    }

    pub fn with_policy(mut self, policy: TrustedTypePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// ページを1回処理する。失敗した場合はエラーを記録して返す。
    pub fn run(&mut self, page: &mut dyn DocumentProvider) -> Result<RunOutcome, PipelineError> {
        match self.run_stages(page) {
            Ok(outcome) => {
                self.transition(Stage::Done);
                Ok(outcome)
            }
            Err(e) => {
                self.transition(Stage::Failed);
                tracing::error!("{}", error_chain(&e));
                Err(e)
            }
        }
    }

    fn run_stages(&mut self, page: &mut dyn DocumentProvider) -> Result<RunOutcome, PipelineError> {
        self.transition(Stage::LoadingLibrary);
        let renderer = load_library(RENDERER_URL, page, self.loader, &self.policy)?;

        self.transition(Stage::SelectingImages);
        let page: &dyn DocumentProvider = page;
        let image_list = match ImageDataList::new(select_blob_images(page)) {
            Ok(list) => list,
            Err(ImageValidationError::EmptyData) => {
                tracing::warn!("Drive のブロブ画像が見つかりませんでした。");
                return Ok(RunOutcome::NoImages);
            }
            Err(e) => return Err(PdfValidationError::from(e).into()),
        };

        self.transition(Stage::BuildingDocument);
        let title = page.meta_content(TITLE_ITEMPROP);
        let pdf = PdfFile::create_file(&image_list, renderer.as_ref(), title)?;

        self.transition(Stage::Saving);
        tracing::info!("PDFを保存しています ({} ページ)...", pdf.page_count());
        let path = pdf.save(self.target)?;
        tracing::info!("PDFを保存しました: {}", path.display());

        Ok(RunOutcome::Saved {
            path,
            file_name: pdf.file_name,
            pages: pdf.pages,
        })
    }

    fn transition(&mut self, next: Stage) {
        tracing::debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// エラーの原因をたどって1行にまとめる。
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut causes = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(": ")
}
