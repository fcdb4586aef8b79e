//! メディア再解決
//!
//! 投稿URLからメディア参照ツールで高解像度のメディアURLを取り直す。
//! 失敗しても致命的ではなく、呼び出し側は保存済みのURLにフォールバックする。

use crate::error::{Result, StyleAiError};
use crate::process::{ProcessRequest, ProcessRunner};
use std::sync::Arc;
use std::time::Duration;
use style_ai_common::{parse_lookup_response, ResolvedMedia};

pub struct MediaResolver {
    runner: Arc<dyn ProcessRunner>,
    command: String,
    args: Vec<String>,
    timeout: Duration,
    max_output: usize,
}

impl MediaResolver {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        command: impl Into<String>,
        args: Vec<String>,
        timeout: Duration,
        max_output: usize,
    ) -> Self {
        Self {
            runner,
            command: command.into(),
            args,
            timeout,
            max_output,
        }
    }

    /// メディアURLを再解決（失敗時は `None`）
    pub async fn resolve(&self, source_url: &str) -> Option<ResolvedMedia> {
        match self.try_resolve(source_url).await {
            Ok(media) => {
                tracing::debug!(source_url, media_url = %media.media_url, is_video = media.is_video, "メディア再解決");
                Some(media)
            }
            Err(e) => {
                tracing::warn!(source_url, error = %e, "メディア再解決に失敗、保存済みURLを使用");
                None
            }
        }
    }

    async fn try_resolve(&self, source_url: &str) -> Result<ResolvedMedia> {
        if source_url.trim().is_empty() {
            return Err(StyleAiError::MediaResolution("投稿URLが空です".into()));
        }

        let mut request = ProcessRequest::new(self.command.as_str(), self.timeout);
        request.args = self.args.clone();
        request.args.push(source_url.to_string());
        request.max_output = self.max_output;

        let output = self.runner.run(&request).await?;
        if !output.success() {
            return Err(StyleAiError::MediaResolution(format!(
                "{} failed (code {:?}): {}",
                self.command,
                output.exit_code,
                output.stderr.trim()
            )));
        }

        parse_lookup_response(&output.stdout)
            .map_err(|e| StyleAiError::MediaResolution(e.to_string()))
    }
}
