use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sku-classifier")]
#[command(about = "SKU属性の辞書分類・属性シート統合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 業種レジストリJSON（省略時は組み込みプリセット）
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// SKUファイルを辞書で分類
    Classify {
        /// SKUファイル（xlsx/csv）
        #[arg(required = true)]
        input: PathBuf,

        /// 業種
        #[arg(short, long)]
        industry: Option<String>,

        /// カテゴリ（辞書の選択）
        #[arg(short, long)]
        category: Option<String>,

        /// 辞書ファイルを直接指定
        #[arg(long)]
        rules: Option<PathBuf>,

        /// 出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 属性シートを統合してマスタを作成
    Consolidate {
        /// 属性シート（複数）
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// 業種
        #[arg(short, long)]
        industry: Option<String>,

        /// 出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 統合後に属性別ファイルへ分割
        #[arg(long)]
        fragment: bool,
    },

    /// マスタを属性別ファイルに分割
    Fragment {
        /// マスタファイル
        #[arg(required = true)]
        master: PathBuf,

        /// 業種（省略時は識別子・品名以外の全列）
        #[arg(short, long)]
        industry: Option<String>,

        /// 出力フォルダ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 1ファイルあたりの最大行数（省略時は設定値）
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// 業種と辞書の一覧を表示
    Industries,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 辞書フォルダを設定
        #[arg(long)]
        set_dictionaries_dir: Option<PathBuf>,

        /// 既定の出力フォルダを設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,
    },
}
