use clap::{Parser, Subcommand};
use hitl_review_common::FilterStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hitl-review")]
#[command(about = "欠陥検出結果の人手レビュー・判定ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 検出を1件ずつ対話的にレビュー
    Review {
        /// 画像フィルタ (all/validated/unvalidated)
        #[arg(short, long, default_value = "all")]
        filter: FilterStatus,

        /// 終了時に判定ログを書き出すファイル/ディレクトリ
        #[arg(short, long)]
        log: Option<PathBuf>,

        /// バックエンドへ判定を同期しない
        #[arg(long)]
        offline: bool,
    },

    /// 進捗と内訳を表示
    Summary,

    /// 設定を表示/編集
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// スライディングウィンドウの画像数を設定
        #[arg(long)]
        set_window_size: Option<usize>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
