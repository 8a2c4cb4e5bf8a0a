//! HTMLスナップショットを `DocumentProvider` として扱うモジュール。
//!
//! ブラウザがページを表示したときと同じように `<img>` を「読み込み」、
//! ブロブURLの画像はブロブ保存先から取り出してデコードしておく。

use super::document_provider::{DocumentProvider, ScriptElement};
use super::image_element::ImageElement;
use crate::domain::blob_source::blob_source::BlobResolver;
use crate::domain::blob_source::path_error::PathError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("HTMLファイルを読み込めません")]
    Io(#[from] std::io::Error),

    #[error("ブロブ画像の取得に失敗しました")]
    Blob(#[from] PathError),

    #[error("セレクタの解析に失敗しました: {0}")]
    Selector(String),
}

/// 解析済みのHTMLページ。
#[derive(Debug)]
pub struct HtmlPage {
    images: Vec<ImageElement>,
    meta: HashMap<String, Option<String>>,
    trusted_types: bool,
    scripts: Vec<ScriptElement>,
}

impl HtmlPage {
    /// ファイルからHTMLを読み込んで解析する。
    pub fn open<P: AsRef<Path>>(path: P, blobs: &dyn BlobResolver) -> Result<Self, PageError> {
        let html = fs::read_to_string(path)?;
        Self::parse(&html, blobs)
    }

    /// HTML文字列を解析し、`blob:` の画像を `blobs` から読み込む。
    ///
    /// 取得できない、またはデコードできない画像は壊れた画像 (0×0) として残す。
    pub fn parse(html: &str, blobs: &dyn BlobResolver) -> Result<Self, PageError> {
        let document = Html::parse_document(html);

        let mut images = Vec::new();
        for element in document.select(&selector("img")?) {
            images.push(load_image(element, blobs)?);
        }

        // 同じ itemprop が複数ある場合は最初の要素だけを見る (querySelector と同じ)。
        // 最初の要素に content がなければ、後続の要素があっても値なしとする。
        let mut meta = HashMap::new();
        for element in document.select(&selector("meta[itemprop]")?) {
            let attrs = element.value();
            if let Some(name) = attrs.attr("itemprop") {
                meta.entry(name.to_string())
                    .or_insert_with(|| attrs.attr("content").map(str::to_string));
            }
        }

        let trusted_types = document
            .select(&selector("meta[http-equiv]")?)
            .any(|element| {
                let attrs = element.value();
                attrs
                    .attr("http-equiv")
                    .map(|v| v.eq_ignore_ascii_case("content-security-policy"))
                    .unwrap_or(false)
                    && attrs
                        .attr("content")
                        .map(|c| c.to_ascii_lowercase().contains("require-trusted-types-for"))
                        .unwrap_or(false)
            });

        tracing::debug!(
            "ページを解析しました: 画像 {} 件, trusted types = {}",
            images.len(),
            trusted_types
        );

        Ok(Self {
            images,
            meta,
            trusted_types,
            scripts: Vec::new(),
        })
    }
}

impl DocumentProvider for HtmlPage {
    fn image_elements(&self) -> &[ImageElement] {
        &self.images
    }

    fn meta_content(&self, itemprop: &str) -> Option<&str> {
        self.meta.get(itemprop).and_then(|content| content.as_deref())
    }

    fn requires_trusted_types(&self) -> bool {
        self.trusted_types
    }

    fn append_script(&mut self, script: ScriptElement) {
        tracing::debug!("script 要素を追加しました: {}", script.src.as_str());
        self.scripts.push(script);
    }
}

fn selector(css: &str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|e| PageError::Selector(format!("{}: {:?}", css, e)))
}

fn load_image(element: ElementRef<'_>, blobs: &dyn BlobResolver) -> Result<ImageElement, PageError> {
    let attrs = element.value();
    let src = attrs.attr("src").unwrap_or_default().trim();

    let display_size = match (
        attrs.attr("width").and_then(|w| w.trim().parse::<u32>().ok()),
        attrs.attr("height").and_then(|h| h.trim().parse::<u32>().ok()),
    ) {
        (Some(w), Some(h)) => Some((w, h)),
        _ => None,
    };

    // ネットワーク越しの画像は取得しない
    let loaded = if src.starts_with("blob:") {
        match blobs.resolve(src)? {
            Some(bytes) => match image::load_from_memory(&bytes) {
                Ok(bitmap) => Some(ImageElement::loaded(src, bitmap)),
                Err(e) => {
                    tracing::warn!("画像 {} をデコードできませんでした: {}", src, e);
                    None
                }
            },
            None => {
                tracing::debug!("画像 {} のブロブが見つかりません", src);
                None
            }
        }
    } else {
        None
    };

    let element = loaded.unwrap_or_else(|| ImageElement::broken(src));
    Ok(match display_size {
        Some((w, h)) => element.with_display_size(w, h),
        None => element,
    })
}
