use image::{DynamicImage, GenericImageView};

/// ページ上の `<img>` 要素。読み取り専用の入力として扱う。
///
/// `natural_width` / `natural_height` はデコード済み画像の本来の画素数で、
/// 表示サイズ (`width` / `height` 属性) とは独立している。
#[derive(Debug, Clone)]
pub struct ImageElement {
    src: String,
    natural_width: u32,
    natural_height: u32,
    display_size: Option<(u32, u32)>,
    bitmap: Option<DynamicImage>,
}

impl ImageElement {
    /// 読み込み済みの画像要素。本来のサイズはビットマップから取る。
    pub fn loaded(src: impl Into<String>, bitmap: DynamicImage) -> Self {
        let (natural_width, natural_height) = bitmap.dimensions();
        Self {
            src: src.into(),
            natural_width,
            natural_height,
            display_size: None,
            bitmap: Some(bitmap),
        }
    }

    /// 読み込みに失敗した画像要素。ブラウザと同じく本来のサイズは 0×0 になる。
    pub fn broken(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            natural_width: 0,
            natural_height: 0,
            display_size: None,
            bitmap: None,
        }
    }

    /// サイズは分かるが画素を読み出せない画像要素 (クロスオリジンで汚染されたキャンバスに相当)。
    pub fn opaque(src: impl Into<String>, natural_width: u32, natural_height: u32) -> Self {
        Self {
            src: src.into(),
            natural_width,
            natural_height,
            display_size: None,
            bitmap: None,
        }
    }

    pub fn with_display_size(mut self, width: u32, height: u32) -> Self {
        self.display_size = Some((width, height));
        self
    }

    pub fn src(&self) -> &str {
        &self.src
    }
    /// (幅, 高さ) をまとめて取得。
    pub fn natural_dimensions(&self) -> (u32, u32) {
        (self.natural_width, self.natural_height)
    }
    pub fn display_size(&self) -> Option<(u32, u32)> {
        self.display_size
    }
    pub fn bitmap(&self) -> Option<&DynamicImage> {
        self.bitmap.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_element_takes_natural_size_from_bitmap() {
        let element = ImageElement::loaded("blob:x/1", DynamicImage::new_rgb8(40, 30))
            .with_display_size(400, 300);

        assert_eq!(element.natural_dimensions(), (40, 30));
        assert_eq!(element.display_size(), Some((400, 300)));
        assert!(element.bitmap().is_some());
    }

    #[test]
    fn broken_element_has_zero_natural_size() {
        let element = ImageElement::broken("blob:x/2");
        assert_eq!(element.natural_dimensions(), (0, 0));
        assert!(element.bitmap().is_none());
    }
}
