//! 外部プロセス実行
//!
//! メディア参照ツールと解析ツールの呼び出しは `ProcessRunner` を通す。
//! テストでは実プロセスを起動しないスクリプト版に差し替える。

use crate::error::{Result, StyleAiError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// 外部コマンドの呼び出し内容
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub timeout: Duration,
    /// stdoutの上限バイト数
    pub max_output: usize,
    pub current_dir: Option<PathBuf>,
}

impl ProcessRequest {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            timeout,
            max_output: crate::config::DEFAULT_MAX_OUTPUT_BYTES,
            current_dir: None,
        }
    }
}

/// 外部コマンドの実行結果
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// シグナル終了時は `None`
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// コマンドを実行して出力を返す
    ///
    /// 非ゼロ終了はエラーではなく `exit_code` で返す。
    /// 起動失敗・タイムアウト・出力上限超過はエラー。
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput>;

    /// コマンドがPATH上で実行可能か
    fn is_available(&self, program: &str) -> bool;
}

/// tokio::process による実装
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

async fn read_capped<R: AsyncRead + Unpin>(pipe: Option<R>, limit: usize) -> std::io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        pipe.take(limit as u64 + 1).read_to_end(&mut buf).await?;
    }
    if buf.len() > limit {
        return Ok(None);
    }
    Ok(Some(buf))
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput> {
        let program = request.program.clone();

        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .stdin(if request.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &request.current_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| StyleAiError::CliExecution(format!("{} の起動に失敗: {}", program, e)))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let io = async {
            let write = async {
                if let (Some(mut pipe), Some(data)) = (stdin, request.stdin.as_deref()) {
                    match pipe.write_all(data.as_bytes()).await {
                        // 入力を読まずに終了するツールもある
                        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                        other => other?,
                    }
                    // dropでパイプを閉じる
                }
                Ok::<_, std::io::Error>(())
            };
            let (written, out, err) = tokio::join!(
                write,
                read_capped(stdout, request.max_output),
                read_capped(stderr, request.max_output),
            );
            written?;
            let (out, err) = (out?, err?);
            if out.is_none() || err.is_none() {
                // 上限を超えた時点で読み取りを止めるので、書き込み待ちのまま残さない
                let _ = child.start_kill();
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, out, err))
        };

        // タイムアウト時はreturnでchildがdropされ、kill_on_dropで停止する
        let (status, out, err) = match tokio::time::timeout(request.timeout, io).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                return Err(StyleAiError::CliExecution(format!("{} の実行中にIOエラー: {}", program, e)))
            }
            Err(_) => {
                return Err(StyleAiError::CliTimeout {
                    program,
                    seconds: request.timeout.as_secs(),
                })
            }
        };

        let (Some(out), Some(err)) = (out, err) else {
            return Err(StyleAiError::OutputTooLarge {
                program,
                limit: request.max_output,
            });
        };

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&out).to_string(),
            stderr: String::from_utf8_lossy(&err).to_string(),
            exit_code: status.code(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
