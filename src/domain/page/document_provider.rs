use super::image_element::ImageElement;
use crate::domain::loader::trusted_types::TrustedScriptUrl;
use std::collections::HashMap;

/// 変換処理から見たページ (DOM) の窓口。
///
/// パイプラインはこのトレイト越しにしかページを触らないため、
/// 実ブラウザなしで `HtmlPage` や `MemoryPage` を差し替えられる。
pub trait DocumentProvider {
    /// ページ内のすべての画像要素を文書順で返す。
    fn image_elements(&self) -> &[ImageElement];

    /// `<meta itemprop="...">` の `content` 値。
    fn meta_content(&self, itemprop: &str) -> Option<&str>;

    /// Trusted Types による script URL の検査が有効かどうか。
    fn requires_trusted_types(&self) -> bool;

    /// ページ末尾に script 要素を追加する。
    fn append_script(&mut self, script: ScriptElement);
}

/// script 要素の `src` に代入された値。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Plain(String),
    Trusted(TrustedScriptUrl),
}

impl ScriptSource {
    pub fn as_str(&self) -> &str {
        match self {
            ScriptSource::Plain(url) => url,
            ScriptSource::Trusted(url) => url.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
    pub src: ScriptSource,
}

/// メモリ上で組み立てるページ。
#[derive(Debug, Default)]
pub struct MemoryPage {
    images: Vec<ImageElement>,
    meta: HashMap<String, String>,
    trusted_types: bool,
    scripts: Vec<ScriptElement>,
}

impl MemoryPage {
    pub fn new(images: Vec<ImageElement>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    pub fn with_meta(mut self, itemprop: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta.insert(itemprop.into(), content.into());
        self
    }

    pub fn with_trusted_types(mut self) -> Self {
        self.trusted_types = true;
        self
    }

    pub fn scripts(&self) -> &[ScriptElement] {
        &self.scripts
    }
}

impl DocumentProvider for MemoryPage {
    fn image_elements(&self) -> &[ImageElement] {
        &self.images
    }

    fn meta_content(&self, itemprop: &str) -> Option<&str> {
        self.meta.get(itemprop).map(String::as_str)
    }

    fn requires_trusted_types(&self) -> bool {
        self.trusted_types
    }

    fn append_script(&mut self, script: ScriptElement) {
        self.scripts.push(script);
    }
}
