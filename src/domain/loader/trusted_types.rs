use super::library_loader::LoadError;

/// ポリシーを通して作られた script URL。ポリシー以外からは作れない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedScriptUrl(String);

impl TrustedScriptUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trusted Types の `createScriptURL` に相当する許可リスト。
///
/// 許可された接頭辞で始まる URL だけを `TrustedScriptUrl` に変換する。
#[derive(Debug, Clone)]
pub struct TrustedTypePolicy {
    name: String,
    allowed_prefixes: Vec<String>,
}

impl TrustedTypePolicy {
    pub fn new(name: impl Into<String>, allowed_prefixes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            allowed_prefixes,
        }
    }

    pub fn create_script_url(&self, input: &str) -> Result<TrustedScriptUrl, LoadError> {
        if self
            .allowed_prefixes
            .iter()
            .any(|prefix| input.starts_with(prefix.as_str()))
        {
            Ok(TrustedScriptUrl(input.to_string()))
        } else {
            Err(LoadError::Blocked {
                url: input.to_string(),
                policy: self.name.clone(),
            })
        }
    }
}

impl Default for TrustedTypePolicy {
    /// 組み込みレンダラーだけを許可する。
    fn default() -> Self {
        Self::new("drive-blob-pdf", vec!["builtin:".to_string()])
    }
}
