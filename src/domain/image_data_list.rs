// use宣言：必要なクレートやモジュールをスコープに取り込む

use crate::domain::page::image_element::ImageElement;
use crate::domain::raster::{self, ConvertError, RasterString};
use thiserror::Error;

// --- 構造体定義 ---

/// PDF作成に渡す、選別済みの画像要素のリスト。
///
/// `new` コンストラクタを通じてのみインスタンス化でき、その際にデータが空でないことが保証されます。
/// 要素の順序はページ上の文書順のままです。
#[derive(Debug)]
pub struct ImageDataList<'a> {
    images: Vec<&'a ImageElement>,
}

// --- エラー定義 ---

/// `ImageDataList` の生成や画像のラスタ化で発生する可能性のあるエラー。
#[derive(Debug, Error)]
pub enum ImageValidationError {
    /// 提供されたデータが空の場合に返されるエラー。
    #[error("データが空です。画像を1つ以上渡してください。")]
    EmptyData,
    /// 画像のラスタ化に失敗した場合に返されるエラー。
    /// `index` フィールドには、問題が検出された画像のインデックスが格納されます。
    #[error("インデックス {index} の画像をラスタ化できません")]
    Conversion {
        index: usize,
        #[source]
        source: ConvertError,
    },
}

// --- 実装ブロック ---

impl<'a> ImageDataList<'a> {
    /// 新しい `ImageDataList` インスタンスを作成（コンストラクタ）。
    ///
    /// # 戻り値
    /// * `Ok(ImageDataList)`: 画像が1つ以上含まれている場合。
    /// * `Err(ImageValidationError::EmptyData)`: データが空の場合。
    pub fn new(images: Vec<&'a ImageElement>) -> Result<Self, ImageValidationError> {
        if images.is_empty() {
            return Err(ImageValidationError::EmptyData);
        }
        Ok(Self { images })
    }

    /// 画像を文書順に1枚ずつラスタ文字列へ変換するイテレータを返す。
    ///
    /// 変換は `next()` のたびに行われ、結果は保持しない。
    pub fn rasters(
        &self,
    ) -> impl Iterator<Item = Result<(&'a ImageElement, RasterString), ImageValidationError>> + '_
    {
        self.images.iter().enumerate().map(|(index, element)| {
            raster::to_raster(element)
                .map(|raster| (*element, raster))
                .map_err(|source| ImageValidationError::Conversion { index, source })
        })
    }

    // --- 便利メソッド ---

    /// 保持している画像の枚数を返します。
    pub(crate) fn len(&self) -> usize {
        self.images.len()
    }
}

// --- テストモジュール ---

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn new_empty_returns_empty_error() {
        let res = ImageDataList::new(Vec::new());
        assert!(matches!(res, Err(ImageValidationError::EmptyData)));
    }

    #[test]
    fn raster_reports_index_of_broken_image() {
        let ok = ImageElement::loaded("blob:a", DynamicImage::new_rgb8(2, 2));
        let broken = ImageElement::broken("blob:b");
        let list = ImageDataList::new(vec![&ok, &broken]).unwrap();

        assert_eq!(list.len(), 2);
        let results: Vec<_> = list.rasters().collect();
        assert!(results[0].is_ok());
        match &results[1] {
            Err(ImageValidationError::Conversion { index, source }) => {
                assert_eq!(*index, 1);
                assert!(matches!(source, ConvertError::ZeroDimensions { .. }));
            }
            other => panic!("予期せぬ結果: {:?}", other),
        }
    }

    #[test]
    fn rasters_keep_order() {
        let a = ImageElement::loaded("blob:a", DynamicImage::new_rgb8(3, 2));
        let b = ImageElement::loaded("blob:b", DynamicImage::new_rgb8(2, 3));
        let list = ImageDataList::new(vec![&a, &b]).unwrap();

        let srcs: Vec<&str> = list
            .rasters()
            .map(|r| r.unwrap().0.src())
            .collect();
        assert_eq!(srcs, vec!["blob:a", "blob:b"]);
    }
}
