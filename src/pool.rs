//! バッチ並行実行
//!
//! ジョブ列を `concurrency` 件ずつのバッチに分け、バッチ内は並行に実行する。
//! バッチ内の全ジョブが終わるまで次のバッチは始めない（途中補充なし）。
//! バッチ間（最後のバッチの後を除く）には固定の待機を入れる。

use crate::analyzer::Analyzer;
use crate::error::StyleAiError;
use crate::resolver::MediaResolver;
use futures::future::join_all;
use indicatif::ProgressBar;
use std::time::Duration;
use style_ai_common::Job;

/// ジョブの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    ResolvingMedia,
    Analyzing,
    Attached,
    Failed,
}

/// ジョブ1件の実行結果
#[derive(Debug)]
pub struct JobOutcome {
    /// `Attached` の場合は解析結果が付与済み
    pub job: Job,
    pub state: JobState,
    pub error: Option<StyleAiError>,
}

/// プール全体の実行結果
#[derive(Debug, Default)]
pub struct PoolReport {
    pub processed: usize,
    pub errors: usize,
    pub outcomes: Vec<JobOutcome>,
}

pub struct WorkerPool<'a> {
    resolver: &'a MediaResolver,
    analyzer: &'a Analyzer,
    concurrency: usize,
    cooldown: Duration,
    resolve_media: bool,
    progress: ProgressBar,
    verbose: bool,
}

impl<'a> WorkerPool<'a> {
    pub fn new(resolver: &'a MediaResolver, analyzer: &'a Analyzer, concurrency: usize, cooldown: Duration) -> Self {
        Self {
            resolver,
            analyzer,
            concurrency: concurrency.max(1),
            cooldown,
            resolve_media: true,
            progress: ProgressBar::hidden(),
            verbose: false,
        }
    }

    /// falseの場合は再解決せず保存済みのメディアで解析する
    pub fn resolve_media(mut self, enabled: bool) -> Self {
        self.resolve_media = enabled;
        self
    }

    pub fn progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub async fn run(&self, jobs: Vec<Job>) -> PoolReport {
        let total = jobs.len();
        let batch_count = total.div_ceil(self.concurrency);
        let mut report = PoolReport::default();
        let mut pending = jobs.into_iter().peekable();
        let mut batch_idx = 0;

        while pending.peek().is_some() {
            let batch: Vec<Job> = pending.by_ref().take(self.concurrency).collect();
            batch_idx += 1;

            if self.verbose {
                println!("  バッチ {}/{}: {}件", batch_idx, batch_count, batch.len());
            }
            tracing::debug!(batch = batch_idx, size = batch.len(), "バッチ開始");

            let outcomes = join_all(batch.into_iter().map(|job| self.process_job(job))).await;

            for outcome in outcomes {
                match outcome.state {
                    JobState::Attached => report.processed += 1,
                    _ => report.errors += 1,
                }
                report.outcomes.push(outcome);
            }

            if pending.peek().is_some() && !self.cooldown.is_zero() {
                tracing::debug!(cooldown_ms = self.cooldown.as_millis() as u64, "バッチ間待機");
                tokio::time::sleep(self.cooldown).await;
            }
        }

        self.progress.finish_and_clear();
        report
    }

    async fn process_job(&self, mut job: Job) -> JobOutcome {
        let mut state = JobState::Pending;
        tracing::debug!(category = %job.category, index = job.index, id = %job.entry.id, ?state, "ジョブ開始");

        let stored = || {
            (
                job.entry.media_url.clone().unwrap_or_default(),
                job.entry.is_video(),
            )
        };

        let (media_url, is_video) = if self.resolve_media {
            state = JobState::ResolvingMedia;
            tracing::debug!(id = %job.entry.id, ?state);
            match self.resolver.resolve(&job.entry.url).await {
                Some(media) => (media.media_url, media.is_video),
                None => stored(),
            }
        } else {
            stored()
        };

        state = JobState::Analyzing;
        tracing::debug!(id = %job.entry.id, %media_url, is_video, ?state);

        let result = self.analyzer.analyze(&media_url, is_video).await;
        self.progress.inc(1);

        match result {
            Ok(analysis) => {
                job.entry.attach_analysis(analysis);
                state = JobState::Attached;
                tracing::info!(category = %job.category, id = %job.entry.id, ?state, "解析結果を付与");
                JobOutcome { job, state, error: None }
            }
            Err(e) => {
                state = JobState::Failed;
                tracing::warn!(category = %job.category, id = %job.entry.id, ?state, error = %e, "解析に失敗");
                if self.verbose {
                    println!("  ⚠ {} ({}): {}", job.entry.id, job.category, e);
                }
                JobOutcome { job, state, error: Some(e) }
            }
        }
    }
}
