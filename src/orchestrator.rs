//! 実行全体の制御
//!
//! 事前チェック → 読み込み → ジョブ選定 → バッチ実行 → 反映・保存 → 集計

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::error::{Result, StyleAiError};
use crate::pool::{JobState, WorkerPool};
use crate::process::ProcessRunner;
use crate::resolver::MediaResolver;
use crate::store;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use style_ai_common::{select_jobs, summarize};

/// 1回の実行オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub limit: Option<usize>,
    pub verbose: bool,
    pub show_progress: bool,
}

/// ドライラン時に表示する予定ジョブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJob {
    pub category: String,
    pub index: usize,
    pub id: String,
    pub media_url: String,
}

/// 実行結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 選定されたジョブ数（limit適用後）
    pub selected: usize,
    pub processed: usize,
    pub errors: usize,
    /// 解析済みのためスキップしたエントリ数
    pub skipped: usize,
    pub saved: bool,
    pub dry_run: bool,
    pub planned: Vec<PlannedJob>,
}

pub struct Orchestrator {
    config: Config,
    runner: Arc<dyn ProcessRunner>,
}

impl Orchestrator {
    pub fn new(config: Config, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn resolver(&self) -> MediaResolver {
        MediaResolver::new(
            self.runner.clone(),
            self.config.lookup_command.as_str(),
            self.config.lookup_args.clone(),
            self.config.resolve_timeout(),
            self.config.max_output_bytes,
        )
    }

    fn analyzer(&self) -> Analyzer {
        Analyzer::new(
            self.runner.clone(),
            self.config.ai_provider,
            self.config.model.clone(),
            self.config.analyze_timeout(),
            self.config.max_output_bytes,
        )
    }

    /// 設定の検証と外部ツールの存在確認
    pub fn preflight(&self) -> Result<()> {
        self.config.validate()?;

        let mut required = Vec::new();
        if self.config.resolve_media {
            required.push(self.config.lookup_command.as_str());
        }
        required.push(self.config.ai_provider.command_name());

        let missing: Vec<&str> = required
            .into_iter()
            .filter(|program| !self.runner.is_available(program))
            .collect();

        if missing.is_empty() {
            tracing::debug!("外部ツールの確認OK");
            Ok(())
        } else {
            Err(StyleAiError::DependencyMissing(missing.join(", ")))
        }
    }

    pub async fn run(&self, options: RunOptions) -> Result<RunSummary> {
        self.preflight()?;
        self.execute(options).await
    }

    /// `preflight` 済みの前提で実行する
    pub async fn execute(&self, options: RunOptions) -> Result<RunSummary> {
        let path = self.config.data_path.as_path();
        let mut dataset = store::load(path)?;
        tracing::info!(path = %path.display(), entries = dataset.len(), "データセット読み込み");

        let selection = summarize(&dataset, &self.config.categories);
        let jobs = select_jobs(&dataset, &self.config.categories, options.limit);

        let mut summary = RunSummary {
            selected: jobs.len(),
            skipped: selection.already_analyzed,
            dry_run: options.dry_run,
            ..Default::default()
        };

        tracing::info!(
            eligible = selection.eligible,
            selected = jobs.len(),
            already_analyzed = selection.already_analyzed,
            without_media = selection.without_media,
            "ジョブ選定"
        );

        if options.dry_run {
            summary.planned = jobs
                .iter()
                .map(|job| PlannedJob {
                    category: job.category.clone(),
                    index: job.index,
                    id: job.entry.id.clone(),
                    media_url: job.entry.media_url.clone().unwrap_or_default(),
                })
                .collect();
            for job in &summary.planned {
                tracing::info!(category = %job.category, index = job.index, id = %job.id, "ドライラン: 解析予定");
            }
            return Ok(summary);
        }

        if jobs.is_empty() {
            return Ok(summary);
        }

        let resolver = self.resolver();
        let analyzer = self.analyzer();
        let progress = if options.show_progress && !options.verbose {
            let bar = ProgressBar::new(jobs.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("  {bar:40} {pos}/{len} {elapsed_precise}") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let report = WorkerPool::new(&resolver, &analyzer, self.config.concurrency, self.config.batch_cooldown())
            .resolve_media(self.config.resolve_media)
            .progress(progress)
            .verbose(options.verbose)
            .run(jobs)
            .await;

        summary.processed = report.processed;
        summary.errors = report.errors;

        // バッチがすべて終わってからデータセットに反映する
        for outcome in report.outcomes.into_iter().filter(|o| o.state == JobState::Attached) {
            let job = outcome.job;
            let Some(analysis) = job.entry.style_analysis else {
                continue;
            };
            match dataset.entry_mut(&job.category, job.index) {
                Some(entry) => {
                    entry.attach_analysis(analysis);
                }
                None => tracing::warn!(category = %job.category, index = job.index, "反映先のエントリが見つかりません"),
            }
        }

        if summary.processed > 0 {
            store::save(&dataset, path)?;
            summary.saved = true;
            tracing::info!(path = %path.display(), processed = summary.processed, "データセット保存");
        }

        Ok(summary)
    }
}
