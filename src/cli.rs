use clap::Parser;
use crate::ai_provider::AiProvider;
use crate::config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "style-ai")]
#[command(about = "コンテンツデータセットにスタイル解析結果を付与", long_about = None)]
pub struct Cli {
    /// 外部ツールを呼ばず、解析予定のジョブだけを表示
    #[arg(long)]
    pub dry_run: bool,

    /// 処理するジョブ数の上限
    #[arg(long)]
    pub limit: Option<usize>,

    /// 設定ファイル（デフォルト: ~/.config/style-ai/config.json）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// データセットJSONファイル
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// 1バッチの同時実行数
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// AIプロバイダ (claude/codex/gemini)
    #[arg(long)]
    pub ai_provider: Option<AiProvider>,

    /// 詳細ログを出力
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// コマンドライン指定で設定を上書き
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(provider) = self.ai_provider {
            config.ai_provider = provider;
        }
    }
}
