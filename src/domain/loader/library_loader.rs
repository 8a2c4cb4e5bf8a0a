//! PDFレンダラー (描画ライブラリ) の読み込み。
//!
//! ページに script 要素を追加し、URL からレンダラーを解決する。
//! ページが Trusted Types を要求している場合は、代入前に URL をポリシーに通す。

use super::trusted_types::TrustedTypePolicy;
use crate::domain::page::document_provider::{DocumentProvider, ScriptElement, ScriptSource};
use crate::domain::pdf_file::renderer::{LopdfFactory, RendererFactory};
use thiserror::Error;

/// 組み込みの lopdf レンダラーを指す URL。
pub const RENDERER_URL: &str = "builtin:lopdf";

#[derive(Debug, Error)]
pub enum LoadError {
    /// Trusted Types のポリシーが URL を拒否した。
    #[error("ポリシー '{policy}' により {url} の読み込みが拒否されました")]
    Blocked { url: String, policy: String },

    /// URL からレンダラーを取得できなかった。
    #[error("レンダラー {url} を読み込めませんでした: {reason}")]
    Unavailable { url: String, reason: String },
}

/// URL からレンダラーを取得する部分。ネットワーク越しの取得に相当する。
pub trait LibraryLoader {
    fn fetch(&self, url: &str) -> Result<Box<dyn RendererFactory>, LoadError>;
}

/// バイナリに組み込まれたレンダラーの一覧。
#[derive(Debug, Default)]
pub struct BuiltinLibraries;

impl LibraryLoader for BuiltinLibraries {
    fn fetch(&self, url: &str) -> Result<Box<dyn RendererFactory>, LoadError> {
        match url {
            RENDERER_URL => Ok(Box::new(LopdfFactory)),
            _ => Err(LoadError::Unavailable {
                url: url.to_string(),
                reason: "組み込みレンダラーではありません".to_string(),
            }),
        }
    }
}

/// レンダラーを読み込み、ページに script 要素を追加する。
pub fn load_library(
    url: &str,
    page: &mut dyn DocumentProvider,
    loader: &dyn LibraryLoader,
    policy: &TrustedTypePolicy,
) -> Result<Box<dyn RendererFactory>, LoadError> {
    let src = if page.requires_trusted_types() {
        ScriptSource::Trusted(policy.create_script_url(url)?)
    } else {
        ScriptSource::Plain(url.to_string())
    };
    page.append_script(ScriptElement { src });

    let factory = loader.fetch(url)?;
    tracing::info!("レンダラー {} を読み込みました。", factory.name());
    Ok(factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::document_provider::MemoryPage;

    struct OfflineLoader;

    impl LibraryLoader for OfflineLoader {
        fn fetch(&self, url: &str) -> Result<Box<dyn RendererFactory>, LoadError> {
            Err(LoadError::Unavailable {
                url: url.to_string(),
                reason: "network error".to_string(),
            })
        }
    }

    #[test]
    fn loads_builtin_renderer_with_plain_script() {
        let mut page = MemoryPage::default();
        let factory = load_library(
            RENDERER_URL,
            &mut page,
            &BuiltinLibraries,
            &TrustedTypePolicy::default(),
        )
        .unwrap();

        assert_eq!(factory.name(), "lopdf");
        assert_eq!(
            page.scripts(),
            &[ScriptElement {
                src: ScriptSource::Plain(RENDERER_URL.to_string())
            }]
        );
    }

    #[test]
    fn wraps_url_when_page_requires_trusted_types() {
        let mut page = MemoryPage::default().with_trusted_types();
        load_library(
            RENDERER_URL,
            &mut page,
            &BuiltinLibraries,
            &TrustedTypePolicy::default(),
        )
        .unwrap();

        assert!(matches!(page.scripts()[0].src, ScriptSource::Trusted(_)));
        assert_eq!(page.scripts()[0].src.as_str(), RENDERER_URL);
    }

    #[test]
    fn blocked_url_never_reaches_the_page() {
        let mut page = MemoryPage::default().with_trusted_types();
        let policy = TrustedTypePolicy::new("strict", Vec::new());

        let result = load_library(RENDERER_URL, &mut page, &BuiltinLibraries, &policy);

        assert!(matches!(result, Err(LoadError::Blocked { .. })));
        assert!(page.scripts().is_empty());
    }

    #[test]
    fn unknown_url_is_unavailable() {
        let mut page = MemoryPage::default();
        let result = load_library(
            "https://unpkg.com/jspdf@latest/dist/jspdf.umd.min.js",
            &mut page,
            &BuiltinLibraries,
            &TrustedTypePolicy::default(),
        );

        assert!(matches!(result, Err(LoadError::Unavailable { .. })));
        // script 要素自体は追加済み (読み込みに失敗しただけ)
        assert_eq!(page.scripts().len(), 1);
    }

    #[test]
    fn network_failure_is_reported() {
        let mut page = MemoryPage::default();
        let result = load_library(
            RENDERER_URL,
            &mut page,
            &OfflineLoader,
            &TrustedTypePolicy::default(),
        );

        match result {
            Err(LoadError::Unavailable { reason, .. }) => assert_eq!(reason, "network error"),
            _ => panic!("読み込みは失敗するはずです"),
        }
    }
}
