// --- 依存モジュール ---

use super::file_name::resolve_file_name;
use super::page_format::PageFormat;
use super::renderer::{DocumentRenderer, RendererFactory};
use super::save_target::SaveTarget;
use crate::domain::image_data_list::{ImageDataList, ImageValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// PDFの生成やファイル保存時に発生する可能性のあるエラーを定義する列挙型。
/// これにより、呼び出し元はエラーの種類に応じた適切な処理を実装できます。
#[derive(Debug, Error)]
pub enum PdfValidationError {
    /// 画像をページに変換できなかった場合。
    #[error("画像の変換に失敗しました")]
    Image(#[from] ImageValidationError),
    /// PDFドキュメントの構築やレンダリング中にエラーが発生した場合。
    #[error("PDFの生成に失敗しました: {0}")]
    PdfCreationError(String),
    /// 生成されたPDFデータをファイルとしてディスクに保存する際にエラーが発生した場合。
    /// 例えば、書き込み権限がないパスを指定した場合などが該当します。
    #[error("PDFの保存に失敗しました: {0}")]
    PdfSaveError(String),
}

/// メモリ上に生成されたPDFファイルとそのメタデータを保持する構造体。
pub struct PdfFile {
    /// 保存時のファイル名。ドキュメントのタイトルにも使われます。
    pub file_name: String,
    /// 各ページの用紙サイズと向き。順序は元の画像の文書順と同じです。
    pub pages: Vec<PageFormat>,
    /// メモリ上にレンダリングされたPDFファイルのバイナリデータ（バイト列）。
    pub pdf_data: Vec<u8>,
}

impl PdfFile {
    /// 画像1枚を1ページとして、画像の本来のサイズをそのまま用紙サイズにしたPDFを生成します。
    ///
    /// # 引数
    /// - `image_data_list`: ページに配置する画像 (文書順)。
    /// - `renderer`: 読み込み済みのレンダラー。
    /// - `meta_title`: ページのメタデータから取ったタイトル。ファイル名の決定に使います。
    ///
    /// # 戻り値
    /// - `Ok(Self)`: PDFの生成に成功した場合。
    /// - `Err(PdfValidationError)`: 途中の画像で失敗した場合。それまでのページは破棄されます。
    pub fn create_file(
        image_data_list: &ImageDataList<'_>,
        renderer: &dyn RendererFactory,
        meta_title: Option<&str>,
    ) -> Result<Self, PdfValidationError> {
        let total = image_data_list.len();
        tracing::info!("{} 件の画像が見つかりました。PDFを作成します...", total);

        let mut doc: Option<Box<dyn DocumentRenderer>> = None;

        for (idx, converted) in image_data_list.rasters().enumerate() {
            // STEP 1: 画像をラスタ文字列に変換する
            let (element, raster) = converted?;

            // STEP 2: 画像の本来のサイズと向きから用紙を決める
            let (width, height) = element.natural_dimensions();
            let format = PageFormat::for_image(width, height);

            // STEP 3: 最初の画像で文書を作り、以降はページを追加する
            let page = match doc.take() {
                Some(mut page) => {
                    page.add_page(format);
                    page
                }
                None => renderer.create(format),
            };
            let page = doc.insert(page);

            // STEP 4: 画像をページ全面に配置する
            page.add_image(
                &raster,
                0.0,
                0.0,
                format.width_px() as f64,
                format.height_px() as f64,
            )?;

            let percent = ((idx + 1) as f64 / total as f64 * 100.0).round();
            tracing::info!("画像を処理中 {}/{} ({}%)", idx + 1, total, percent);
        }

        let doc = doc.ok_or(ImageValidationError::EmptyData)?;
        let pages = doc.pages();
        let file_name = resolve_file_name(meta_title);
        let pdf_data = doc.output(&file_name)?;

        Ok(Self {
            file_name,
            pages,
            pdf_data,
        })
    }

    /// ページ数を返します。
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 保存先にPDFを渡します。ブラウザでのダウンロードに相当します。
    pub fn save(&self, target: &dyn SaveTarget) -> Result<PathBuf, PdfValidationError> {
        target.save(&self.file_name, &self.pdf_data)
    }
}
