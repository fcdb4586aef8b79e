//! AI CLI連携モジュール
//!
//! 解析処理:
//! - メディア種別に応じたプロンプトを生成（静止画/動画）
//! - AI CLIに標準入力でプロンプトを渡して実行
//! - 出力から最初の `{` 〜 最後の `}` を取り出してデコード
//!
//! 共通ロジックは style_ai_common から使用

use crate::ai_provider::AiProvider;
use crate::error::{Result, StyleAiError};
use crate::process::{ProcessRequest, ProcessRunner};
use std::sync::Arc;
use std::time::Duration;
use style_ai_common::{build_style_prompt, parse_style_response, StyleAnalysis};

pub struct Analyzer {
    runner: Arc<dyn ProcessRunner>,
    provider: AiProvider,
    model: Option<String>,
    timeout: Duration,
    max_output: usize,
}

impl Analyzer {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        provider: AiProvider,
        model: Option<String>,
        timeout: Duration,
        max_output: usize,
    ) -> Self {
        Self {
            runner,
            provider,
            model,
            timeout,
            max_output,
        }
    }

    pub fn command(&self) -> &'static str {
        self.provider.command_name()
    }

    /// メディアを解析してスタイル解析結果を返す
    ///
    /// 失敗はすべて `Err` で返し、再試行はしない。
    pub async fn analyze(&self, media_url: &str, is_video: bool) -> Result<StyleAnalysis> {
        let prompt = build_style_prompt(media_url, is_video);

        // ツールが取得したメディア等の作業ファイル置き場（drop時に削除）
        let workspace = tempfile::Builder::new().prefix("style-ai-").tempdir()?;

        let mut request = ProcessRequest::new(self.command(), self.timeout);
        request.args = self.provider.prompt_args(self.model.as_deref());
        request.stdin = Some(prompt);
        request.max_output = self.max_output;
        request.current_dir = Some(workspace.path().to_path_buf());

        tracing::debug!(media_url, is_video, command = self.command(), "解析開始");

        let output = self.runner.run(&request).await?;
        if !output.success() {
            return Err(StyleAiError::CliExecution(format!(
                "{} failed (code {:?}): {}",
                self.command(),
                output.exit_code,
                output.stderr.trim()
            )));
        }

        tracing::debug!(media_url, response_len = output.stdout.len(), "解析レスポンス受信");

        parse_style_response(&output.stdout).map_err(|e| StyleAiError::ApiParse(e.to_string()))
    }
}
