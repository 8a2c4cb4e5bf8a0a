use crate::domain::page::document_provider::DocumentProvider;
use crate::domain::page::image_element::ImageElement;

/// Google Drive のビューアがメモリ上に作る画像のURL接頭辞。
pub const DRIVE_BLOB_PREFIX: &str = "blob:https://drive.google.com/";

/// `src` が Drive のブロブURLで始まる画像要素を文書順に集める。
///
/// 該当がなければ空の `Vec` を返す (エラーではない)。
pub fn select_blob_images(page: &dyn DocumentProvider) -> Vec<&ImageElement> {
    page.image_elements()
        .iter()
        .filter(|img| img.src().starts_with(DRIVE_BLOB_PREFIX))
        .collect()
}
