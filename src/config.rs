use crate::ai_provider::AiProvider;
use crate::error::{Result, StyleAiError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 解析上限: 10MB
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// データセットJSONのパス
    pub data_path: PathBuf,
    /// 解析対象カテゴリ
    pub categories: Vec<String>,
    /// 1バッチの同時実行数
    pub concurrency: usize,
    /// バッチ間の待機時間
    pub batch_cooldown_ms: u64,
    pub resolve_timeout_seconds: u64,
    pub analyze_timeout_seconds: u64,
    pub max_output_bytes: usize,
    /// メディア参照ツール
    pub lookup_command: String,
    pub lookup_args: Vec<String>,
    pub ai_provider: AiProvider,
    pub model: Option<String>,
    /// falseの場合はメディア再解決を行わず、保存済みURLで直接解析する
    pub resolve_media: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/content.json"),
            categories: ["art", "design", "illustration", "photography", "3d", "motion"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            concurrency: 5,
            batch_cooldown_ms: 2000,
            resolve_timeout_seconds: 30,
            analyze_timeout_seconds: 180,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            lookup_command: "bird".into(),
            lookup_args: vec!["read".into(), "--json".into()],
            ai_provider: AiProvider::default(),
            model: None,
            resolve_media: true,
        }
    }
}

impl Config {
    /// 既定の設定ファイルを読み込み（なければデフォルト）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StyleAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("style-ai").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(StyleAiError::Config("concurrencyは1以上を指定してください".into()));
        }
        if self.categories.is_empty() {
            return Err(StyleAiError::Config("categoriesが空です".into()));
        }
        if self.resolve_media && self.lookup_command.trim().is_empty() {
            return Err(StyleAiError::Config("lookupCommandが空です".into()));
        }
        Ok(())
    }

    pub fn batch_cooldown(&self) -> Duration {
        Duration::from_millis(self.batch_cooldown_ms)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_seconds)
    }

    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_secs(self.analyze_timeout_seconds)
    }
}
