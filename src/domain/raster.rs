//! 画像要素をラスタ文字列 (PNG の data URL) に変換するモジュール。

use crate::domain::page::image_element::ImageElement;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum ConvertError {
    /// 本来のサイズが 0 の画像 (読み込み失敗を含む)。
    #[error("画像 {src} の本来のサイズが 0 です ({width}x{height})")]
    ZeroDimensions { src: String, width: u32, height: u32 },

    /// サイズは分かるが画素を読み出せない画像。
    #[error("画像 {src} の画素データを読み出せません")]
    Tainted { src: String },

    #[error("PNGへのエンコードに失敗しました")]
    Encode(#[from] image::ImageError),

    #[error("ラスタ文字列の形式が不正です: {0}")]
    Malformed(String),
}

/// 1枚の画像の画素を可逆に表したもの (`data:image/png;base64,...`)。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterString(String);

impl RasterString {
    /// PNG のバイト列から data URL を作る。
    pub fn from_png(png: &[u8]) -> Self {
        Self(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// data URL を画像に戻す。
    pub fn decode(&self) -> Result<DynamicImage, ConvertError> {
        let payload = self
            .0
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| ConvertError::Malformed("PNGのdata URLではありません".to_string()))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| ConvertError::Malformed(e.to_string()))?;
        Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Png)?)
    }
}

/// 画像要素を本来のサイズのキャンバスに描き、PNG の data URL として取り出す。
///
/// 表示サイズは使わない。
pub fn to_raster(element: &ImageElement) -> Result<RasterString, ConvertError> {
    let (width, height) = element.natural_dimensions();
    if width == 0 || height == 0 {
        return Err(ConvertError::ZeroDimensions {
            src: element.src().to_string(),
            width,
            height,
        });
    }
    let bitmap = element.bitmap().ok_or_else(|| ConvertError::Tainted {
        src: element.src().to_string(),
    })?;

    // natural_dimensions はビットマップのサイズそのものなので拡縮は不要
    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(&mut canvas, &bitmap.to_rgba8(), 0, 0);

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(RasterString::from_png(&png))
}
