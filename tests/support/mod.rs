//! 統合テスト用の共通部品
//!
//! 実プロセスを起動しない `ProcessRunner` とデータセットのフィクスチャ

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use style_ai_rust::config::Config;
use style_ai_rust::error::Result;
use style_ai_rust::process::{ProcessOutput, ProcessRequest, ProcessRunner};
use tokio::time::Instant;

pub const LOOKUP: &str = "bird";
pub const ANALYSIS: &str = "gemini";

type Handler = Box<dyn Fn(&ProcessRequest) -> Result<ProcessOutput> + Send + Sync>;

/// 記録された呼び出し
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub started: Instant,
}

/// プログラム名ごとに応答を返すランナー
pub struct ScriptedRunner {
    handlers: HashMap<String, Handler>,
    missing: HashSet<String>,
    delay: Duration,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            missing: HashSet::new(),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(
        mut self,
        program: &str,
        handler: impl Fn(&ProcessRequest) -> Result<ProcessOutput> + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(program.to_string(), Box::new(handler));
        self
    }

    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// 各呼び出しにかかる時間
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.program == program).collect()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push(Call {
            program: request.program.clone(),
            args: request.args.clone(),
            stdin: request.stdin.clone(),
            started: Instant::now(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.handlers.get(&request.program) {
            Some(handler) => handler(request),
            None => Ok(exit(127, "command not scripted")),
        }
    }

    fn is_available(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }
}

pub fn ok(stdout: &str) -> ProcessOutput {
    ProcessOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: Some(0),
    }
}

pub fn exit(code: i32, stderr: &str) -> ProcessOutput {
    ProcessOutput {
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code: Some(code),
    }
}

/// 解析ツールの典型的な応答（前後にノイズあり）
pub fn analysis_output(prompt: &str) -> String {
    format!(
        "Loaded cached credentials.\n```json\n{{\"prompt\":\"{}\",\"style\":[\"minimal\",\"flat\"],\"colorPalette\":[\"#FFFFFF\",\"#111111\"],\"technique\":\"vector\",\"mood\":\"calm\",\"movement\":\"swiss\"}}\n```\n",
        prompt
    )
}

/// 解析ツールに渡されたプロンプト中のメディアURL
pub fn prompt_media_url(request: &ProcessRequest) -> String {
    request
        .stdin
        .as_deref()
        .unwrap_or_default()
        .lines()
        .find_map(|line| line.strip_prefix("Image: ").or_else(|| line.strip_prefix("Video: ")))
        .unwrap_or_default()
        .to_string()
}

/// テスト用の設定（待機なし）
pub fn test_config(data_path: &Path) -> Config {
    Config {
        data_path: data_path.to_path_buf(),
        categories: vec!["art".into(), "design".into()],
        batch_cooldown_ms: 0,
        ..Default::default()
    }
}

fn entry_json(category: &str, index: usize) -> String {
    format!(
        r#"{{"id":"{c}-{i}","text":"post {i}","author":"@{c}","url":"https://x.example.com/{c}/status/{i}","mediaType":"photo","mediaUrl":"https://pbs.example.com/{c}-{i}.jpg"}}"#,
        c = category,
        i = index
    )
}

/// 各カテゴリに指定件数の未解析エントリを持つデータセットを書き出す
pub fn write_dataset(dir: &Path, categories: &[(&str, usize)]) -> PathBuf {
    let body = categories
        .iter()
        .map(|(name, count)| {
            let entries = (0..*count).map(|i| entry_json(name, i)).collect::<Vec<_>>().join(",\n    ");
            format!("  \"{}\": [\n    {}\n  ]", name, entries)
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let path = dir.join("content.json");
    std::fs::write(&path, format!("{{\n{}\n}}\n", body)).unwrap();
    path
}
