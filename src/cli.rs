use clap::Parser;
use std::path::PathBuf;

/// Google Drive のビューアで表示された画像をPDFにまとめるツール
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 保存したビューアページ (HTML) のパス
    #[arg(required = true)]
    pub html_path: PathBuf,

    /// ブロブ画像を書き出したフォルダまたはZIPファイルのパス
    #[arg(short, long)]
    pub blobs: PathBuf,

    /// PDFの出力先フォルダのパス (オプション: デフォルトはHTMLと同じフォルダ)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
