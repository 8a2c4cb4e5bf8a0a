//! アプリケーションのメインワークフローを定義するモジュール。
//!
//! このモジュールは、UI層（`cli`）とドメイン層（`domain`）を仲介し、
//! ページの読み込みから PDF の保存までを実行します。

use crate::cli::Args;
use drive_blob_pdf::domain::loader::library_loader::BuiltinLibraries;
use drive_blob_pdf::domain::pdf_file::save_target::DirectoryTarget;
use drive_blob_pdf::domain::{BlobSource, HtmlPage, Pipeline, RunOutcome};
use drive_blob_pdf::error::AppError;
use std::path::Path;

/// アプリケーションのメインロジックを実行します。
///
/// # 戻り値
/// * `Ok(RunOutcome)`: PDFを保存した、または対象画像がなく何もしなかった場合。
/// * `Err(AppError)`: 処理中に回復不可能なエラーが発生した場合。
pub fn run(args: Args) -> Result<RunOutcome, AppError> {
    // 1. ブロブ保存先の検証 (ディレクトリ or ZIP)
    let blobs = BlobSource::new(&args.blobs)?;
    tracing::info!("ブロブ画像の読み込み元: {}", blobs.as_path().display());

    // 2. 出力ディレクトリの決定
    // 指定がなければ HTML ファイルと同じフォルダに出力する。
    // フォルダがなければ保存する時点で作成される。
    let output_dir = match args.output_dir.as_deref() {
        Some(dir) => dir,
        None => args
            .html_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new(".")),
    };

    // 3. ページを読み込み、画像をブロブから解決する
    tracing::info!("ページを読み込んでいます: {}", args.html_path.display());
    let mut page = HtmlPage::open(&args.html_path, &blobs)?;

    // 4. パイプラインを実行
    let target = DirectoryTarget::new(output_dir);
    let outcome = Pipeline::new(&BuiltinLibraries, &target).run(&mut page)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use std::fs;
    use image::{ExtendedColorType, ImageEncoder};
    use tempfile::tempdir;

    fn create_dummy_png(width: u32, height: u32) -> Vec<u8> {
        let buf = vec![200u8; (width * height * 3) as usize];
        let mut result = Vec::new();
        PngEncoder::new(&mut result)
            .write_image(&buf, width, height, ExtendedColorType::Rgb8)
            .expect("PNGのエンコードに失敗");
        result
    }

    #[test]
    fn run_writes_pdf_named_after_meta() {
        let dir = tempdir().unwrap();
        let blobs = dir.path().join("blobs");
        fs::create_dir(&blobs).unwrap();
        fs::write(blobs.join("aaa.png"), create_dummy_png(30, 20)).unwrap();
        fs::write(blobs.join("bbb.png"), create_dummy_png(20, 30)).unwrap();

        let html_path = dir.path().join("viewer.html");
        fs::write(
            &html_path,
            r#"<html><head><meta itemprop="name" content="議事録"></head><body>
                <img src="blob:https://drive.google.com/aaa">
                <img src="https://www.gstatic.com/icon.png">
                <img src="blob:https://drive.google.com/bbb">
            </body></html>"#,
        )
        .unwrap();

        let out = dir.path().join("out");
        let outcome = run(Args {
            html_path,
            blobs,
            output_dir: Some(out.clone()),
        })
        .unwrap();

        match outcome {
            RunOutcome::Saved { path, pages, .. } => {
                assert_eq!(path, out.join("議事録.pdf"));
                assert_eq!(pages.len(), 2);
                let doc = lopdf::Document::load(&path).unwrap();
                assert_eq!(doc.get_pages().len(), 2);
            }
            RunOutcome::NoImages => panic!("PDFが保存されるはずです"),
        }
    }

    #[test]
    fn run_without_matches_writes_nothing() {
        let dir = tempdir().unwrap();
        let html_path = dir.path().join("viewer.html");
        fs::write(&html_path, r#"<html><body><img src="a.png"></body></html>"#).unwrap();

        let outcome = run(Args {
            html_path,
            blobs: dir.path().to_path_buf(),
            output_dir: None,
        })
        .unwrap();

        assert!(matches!(outcome, RunOutcome::NoImages));
        assert!(!dir.path().join("download.pdf").exists());
    }

    #[test]
    fn run_without_matches_leaves_output_dir_uncreated() {
        let dir = tempdir().unwrap();
        let html_path = dir.path().join("viewer.html");
        fs::write(&html_path, r#"<html><body><img src="a.png"></body></html>"#).unwrap();
        let out = dir.path().join("out");

        let outcome = run(Args {
            html_path,
            blobs: dir.path().to_path_buf(),
            output_dir: Some(out.clone()),
        })
        .unwrap();

        assert!(matches!(outcome, RunOutcome::NoImages));
        assert!(!out.exists());
    }

    #[test]
    fn run_names_file_download_when_first_meta_has_no_content() {
        let dir = tempdir().unwrap();
        let blobs = dir.path().join("blobs");
        fs::create_dir(&blobs).unwrap();
        fs::write(blobs.join("aaa.png"), create_dummy_png(10, 10)).unwrap();

        let html_path = dir.path().join("viewer.html");
        fs::write(
            &html_path,
            r#"<html><head>
                <meta itemprop="name">
                <meta itemprop="name" content="Second">
            </head><body><img src="blob:https://drive.google.com/aaa"></body></html>"#,
        )
        .unwrap();

        match run(Args {
            html_path,
            blobs,
            output_dir: None,
        })
        .unwrap()
        {
            RunOutcome::Saved { path, file_name, .. } => {
                assert_eq!(file_name, "download.pdf");
                assert_eq!(path, dir.path().join("download.pdf"));
            }
            RunOutcome::NoImages => panic!("PDFが保存されるはずです"),
        }
    }

    #[test]
    fn run_rejects_missing_blob_source() {
        let dir = tempdir().unwrap();
        let result = run(Args {
            html_path: dir.path().join("viewer.html"),
            blobs: dir.path().join("missing"),
            output_dir: None,
        });

        assert!(matches!(result, Err(AppError::Path(_))));
    }
}
