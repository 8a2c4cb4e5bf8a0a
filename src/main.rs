mod cli;
mod workflow;

use clap::Parser;
use drive_blob_pdf::domain::pipeline::error_chain;
use drive_blob_pdf::domain::RunOutcome;
use tracing_subscriber::EnvFilter;

fn main() {
    // ログ出力の初期化 (RUST_LOG で上書き可能、デフォルトは info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // コマンドライン引数を解析します
    let args = cli::Args::parse();

    match workflow::run(args) {
        Ok(RunOutcome::Saved { path, pages, .. }) => {
            println!("{} ページのPDFを作成しました: {}", pages.len(), path.display());
        }
        Ok(RunOutcome::NoImages) => {
            println!("対象の画像がなかったため、PDFは作成しませんでした。");
        }
        Err(e) => {
            eprintln!("エラー: {}", error_chain(&e));
            std::process::exit(1);
        }
    }
}
