/// ファイル名の元になる `<meta itemprop="...">`。
pub const TITLE_ITEMPROP: &str = "name";
pub const DEFAULT_FILE_NAME: &str = "download.pdf";
const PDF_EXTENSION: &str = ".pdf";

/// メタデータの値から保存ファイル名を決める。
///
/// 値がなければ `download.pdf`。`.pdf` で終わっていなければ付け足す。
pub fn resolve_file_name(meta_title: Option<&str>) -> String {
    match meta_title {
        Some(title) if !title.is_empty() => {
            let name = sanitize(title);
            if name.ends_with(PDF_EXTENSION) {
                name
            } else {
                format!("{}{}", name, PDF_EXTENSION)
            }
        }
        _ => DEFAULT_FILE_NAME.to_string(),
    }
}

// パス区切りや予約文字はファイル名に使えないので置き換える
fn sanitize(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
